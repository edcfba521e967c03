use super::{MessageElement, MessageOption};

/// Print elements back to canonical message text.
pub fn print_message(elements: &[MessageElement]) -> String {
    let mut out = String::new();
    print_elements(elements, false, &mut out);
    out
}

fn print_elements(elements: &[MessageElement], in_plural: bool, out: &mut String) {
    for element in elements {
        match element {
            MessageElement::Literal(text) => print_literal(text, in_plural, out),
            MessageElement::Argument(name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            MessageElement::Formatted {
                name,
                format,
                style,
            } => {
                out.push('{');
                out.push_str(name);
                out.push_str(", ");
                out.push_str(format.as_str());
                if let Some(style) = style {
                    out.push_str(", ");
                    out.push_str(style);
                }
                out.push('}');
            }
            MessageElement::Plural {
                name,
                ordinal,
                offset,
                options,
            } => {
                out.push('{');
                out.push_str(name);
                out.push_str(if *ordinal {
                    ", selectordinal, "
                } else {
                    ", plural, "
                });
                if *offset != 0 {
                    out.push_str(&format!("offset:{offset} "));
                }
                print_options(options, true, out);
                out.push('}');
            }
            MessageElement::Select { name, options } => {
                out.push('{');
                out.push_str(name);
                out.push_str(", select, ");
                print_options(options, in_plural, out);
                out.push('}');
            }
            MessageElement::Pound => out.push('#'),
        }
    }
}

fn print_options(options: &[MessageOption], in_plural: bool, out: &mut String) {
    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&option.selector);
        out.push_str(" {");
        print_elements(&option.value, in_plural, out);
        out.push('}');
    }
}

/// Quote syntax characters one at a time and double any apostrophe that
/// the parser would otherwise read as the start of a quoted run.
fn print_literal(text: &str, in_plural: bool, out: &mut String) {
    let is_special = |c: char| matches!(c, '{' | '}') || (in_plural && c == '#');

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            match chars.peek() {
                None => out.push_str("''"),
                Some(&next) if next == '\'' || is_special(next) => out.push_str("''"),
                Some(_) => out.push('\''),
            }
        } else if is_special(c) {
            out.push('\'');
            out.push(c);
            out.push('\'');
        } else {
            out.push(c);
        }
    }
}
