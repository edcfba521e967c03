use super::{
    FormatKind, MessageElement, MessageOption, MessageSyntaxError, SyntaxErrorKind,
};

const PLURAL_KEYWORDS: &[&str] = &["zero", "one", "two", "few", "many", "other"];

type ParseResult<T> = Result<T, MessageSyntaxError>;

/// Parse a message into its element tree.
pub fn parse_message(text: &str) -> ParseResult<Vec<MessageElement>> {
    let mut parser = Parser { text, pos: 0 };
    parser.parse_elements(0, false)
}

struct Parser<'t> {
    text: &'t str,
    /// Byte offset of the next unread character.
    pos: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, kind: SyntaxErrorKind) -> MessageSyntaxError {
        MessageSyntaxError::new(kind, self.pos)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char, kind: SyntaxErrorKind) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            None => Err(self.error(SyntaxErrorKind::UnclosedArgument)),
            Some(_) => Err(self.error(kind)),
        }
    }

    /// Read a run of characters that may appear in names and selectors.
    fn take_word(&mut self) -> &'t str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '{' | '}' | ',' | '#' | '\'') {
                break;
            }
            self.bump();
        }
        &self.text[start..self.pos]
    }

    fn parse_elements(&mut self, depth: usize, in_plural: bool) -> ParseResult<Vec<MessageElement>> {
        let mut elements = Vec::new();
        let mut literal = String::new();

        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    flush_literal(&mut literal, &mut elements);
                    elements.push(self.parse_argument(depth, in_plural)?);
                }
                '}' => {
                    if depth > 0 {
                        break;
                    }
                    return Err(self.error(SyntaxErrorKind::UnmatchedClosingBrace));
                }
                '#' if in_plural => {
                    flush_literal(&mut literal, &mut elements);
                    self.bump();
                    elements.push(MessageElement::Pound);
                }
                '\'' => self.parse_apostrophe(in_plural, &mut literal),
                _ => {
                    literal.push(c);
                    self.bump();
                }
            }
        }

        flush_literal(&mut literal, &mut elements);
        Ok(elements)
    }

    /// `''` is a literal apostrophe; an apostrophe before a syntax character
    /// starts a quoted run that lasts until the next lone apostrophe (or the
    /// end of the message); any other apostrophe is literal.
    fn parse_apostrophe(&mut self, in_plural: bool, literal: &mut String) {
        self.bump();
        match self.peek() {
            Some('\'') => {
                self.bump();
                literal.push('\'');
            }
            Some('{' | '}') => self.take_quoted(literal),
            Some('#') if in_plural => self.take_quoted(literal),
            _ => literal.push('\''),
        }
    }

    fn take_quoted(&mut self, literal: &mut String) {
        while let Some(c) = self.bump() {
            if c == '\'' {
                if self.peek() == Some('\'') {
                    self.bump();
                    literal.push('\'');
                    continue;
                }
                return;
            }
            literal.push(c);
        }
    }

    fn parse_argument(&mut self, depth: usize, in_plural: bool) -> ParseResult<MessageElement> {
        // consume `{`
        self.bump();
        self.skip_whitespace();

        let name = self.take_word().to_string();
        if name.is_empty() {
            return Err(match self.peek() {
                Some('}') => self.error(SyntaxErrorKind::EmptyArgument),
                None => self.error(SyntaxErrorKind::UnclosedArgument),
                Some(_) => self.error(SyntaxErrorKind::MalformedArgument),
            });
        }
        self.skip_whitespace();

        match self.peek() {
            Some('}') => {
                self.bump();
                Ok(MessageElement::Argument(name))
            }
            Some(',') => {
                self.bump();
                self.skip_whitespace();
                self.parse_typed_argument(name, depth, in_plural)
            }
            None => Err(self.error(SyntaxErrorKind::UnclosedArgument)),
            Some(_) => Err(self.error(SyntaxErrorKind::MalformedArgument)),
        }
    }

    fn parse_typed_argument(
        &mut self,
        name: String,
        depth: usize,
        in_plural: bool,
    ) -> ParseResult<MessageElement> {
        let type_start = self.pos;
        let ty = self.take_word();
        if ty.is_empty() {
            return Err(self.error(SyntaxErrorKind::ExpectedArgumentType));
        }
        self.skip_whitespace();

        let format = match ty {
            "number" => Some(FormatKind::Number),
            "date" => Some(FormatKind::Date),
            "time" => Some(FormatKind::Time),
            _ => None,
        };
        if let Some(format) = format {
            let style = self.parse_style()?;
            return Ok(MessageElement::Formatted {
                name,
                format,
                style,
            });
        }

        match ty {
            "plural" | "selectordinal" => {
                self.expect(',', SyntaxErrorKind::MalformedArgument)?;
                self.skip_whitespace();
                let offset = self.parse_offset()?;
                let options = self.parse_options(depth, true, true)?;
                Ok(MessageElement::Plural {
                    name,
                    ordinal: ty == "selectordinal",
                    offset,
                    options,
                })
            }
            "select" => {
                self.expect(',', SyntaxErrorKind::MalformedArgument)?;
                let options = self.parse_options(depth, in_plural, false)?;
                Ok(MessageElement::Select { name, options })
            }
            other => Err(MessageSyntaxError::new(
                SyntaxErrorKind::InvalidArgumentType(other.to_string()),
                type_start,
            )),
        }
    }

    fn parse_style(&mut self) -> ParseResult<Option<String>> {
        match self.peek() {
            Some('}') => {
                self.bump();
                Ok(None)
            }
            Some(',') => {
                self.bump();
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == '}' {
                        break;
                    }
                    if c == '{' {
                        return Err(self.error(SyntaxErrorKind::MalformedArgument));
                    }
                    self.bump();
                }
                let style = self.text[start..self.pos].trim();
                if style.is_empty() {
                    return Err(self.error(SyntaxErrorKind::ExpectedArgumentStyle));
                }
                let style = style.to_string();
                self.expect('}', SyntaxErrorKind::UnclosedArgument)?;
                Ok(Some(style))
            }
            None => Err(self.error(SyntaxErrorKind::UnclosedArgument)),
            Some(_) => Err(self.error(SyntaxErrorKind::MalformedArgument)),
        }
    }

    fn parse_offset(&mut self) -> ParseResult<i64> {
        if !self.text[self.pos..].starts_with("offset:") {
            return Ok(0);
        }
        self.pos += "offset:".len();
        self.skip_whitespace();
        let value = self.take_word();
        let offset = value
            .parse::<i64>()
            .map_err(|_| self.error(SyntaxErrorKind::InvalidOffset))?;
        Ok(offset)
    }

    fn parse_options(
        &mut self,
        depth: usize,
        in_plural: bool,
        plural_selectors: bool,
    ) -> ParseResult<Vec<MessageOption>> {
        let mut options: Vec<MessageOption> = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(SyntaxErrorKind::UnclosedArgument)),
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
            }

            let selector_start = self.pos;
            let selector = self.take_word();
            if selector.is_empty() {
                return Err(self.error(SyntaxErrorKind::ExpectedSelector));
            }
            if plural_selectors && !is_plural_selector(selector) {
                return Err(MessageSyntaxError::new(
                    SyntaxErrorKind::InvalidPluralSelector(selector.to_string()),
                    selector_start,
                ));
            }
            if options.iter().any(|o| o.selector == selector) {
                return Err(MessageSyntaxError::new(
                    SyntaxErrorKind::DuplicateSelector(selector.to_string()),
                    selector_start,
                ));
            }
            let selector = selector.to_string();

            self.skip_whitespace();
            self.expect('{', SyntaxErrorKind::ExpectedOptionBody)?;
            let value = self.parse_elements(depth + 1, in_plural)?;
            self.expect('}', SyntaxErrorKind::UnclosedArgument)?;

            options.push(MessageOption { selector, value });
        }

        if options.is_empty() {
            return Err(self.error(SyntaxErrorKind::ExpectedSelector));
        }
        if !options.iter().any(|o| o.selector == "other") {
            return Err(self.error(SyntaxErrorKind::MissingOtherClause));
        }
        Ok(options)
    }
}

fn flush_literal(literal: &mut String, elements: &mut Vec<MessageElement>) {
    if !literal.is_empty() {
        elements.push(MessageElement::Literal(std::mem::take(literal)));
    }
}

fn is_plural_selector(selector: &str) -> bool {
    if let Some(number) = selector.strip_prefix('=') {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }
    PLURAL_KEYWORDS.contains(&selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn literal(text: &str) -> MessageElement {
        MessageElement::Literal(text.to_string())
    }

    #[test]
    fn test_parse_literal_and_argument() {
        let elements = parse_message("Hello, {name}!").unwrap();
        assert_eq!(
            elements,
            vec![
                literal("Hello, "),
                MessageElement::Argument("name".to_string()),
                literal("!"),
            ]
        );
    }

    #[test]
    fn test_parse_formatted_argument() {
        let elements = parse_message("{total, number, ::currency/EUR}").unwrap();
        assert_eq!(
            elements,
            vec![MessageElement::Formatted {
                name: "total".to_string(),
                format: FormatKind::Number,
                style: Some("::currency/EUR".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_plural_with_offset_and_pound() {
        let elements =
            parse_message("{n, plural, offset:1 =0 {none} other {# more}}").unwrap();
        let MessageElement::Plural {
            name,
            ordinal,
            offset,
            options,
        } = &elements[0]
        else {
            panic!("expected plural, got {elements:?}");
        };
        assert_eq!(name, "n");
        assert!(!ordinal);
        assert_eq!(*offset, 1);
        assert_eq!(options[0].selector, "=0");
        assert_eq!(options[1].value, vec![MessageElement::Pound, literal(" more")]);
    }

    #[test]
    fn test_pound_is_literal_outside_plural() {
        let elements = parse_message("Item #1").unwrap();
        assert_eq!(elements, vec![literal("Item #1")]);
    }

    #[test]
    fn test_parse_select_nested_in_plural_keeps_pound() {
        let elements = parse_message(
            "{n, plural, other {{g, select, male {# his} other {# their}}}}",
        )
        .unwrap();
        let MessageElement::Plural { options, .. } = &elements[0] else {
            panic!("expected plural");
        };
        let MessageElement::Select { options, .. } = &options[0].value[0] else {
            panic!("expected select");
        };
        assert_eq!(options[0].value[0], MessageElement::Pound);
    }

    #[test]
    fn test_apostrophe_quoting() {
        assert_eq!(parse_message("It's").unwrap(), vec![literal("It's")]);
        assert_eq!(parse_message("a''b").unwrap(), vec![literal("a'b")]);
        assert_eq!(
            parse_message("'{name}' is literal").unwrap(),
            vec![literal("{name} is literal")]
        );
        assert_eq!(
            parse_message("'{unterminated").unwrap(),
            vec![literal("{unterminated")]
        );
    }

    #[test]
    fn test_errors() {
        let cases = [
            ("{}", SyntaxErrorKind::EmptyArgument),
            ("{name", SyntaxErrorKind::UnclosedArgument),
            ("oops }", SyntaxErrorKind::UnmatchedClosingBrace),
            ("{a b}", SyntaxErrorKind::MalformedArgument),
            ("{a, }", SyntaxErrorKind::ExpectedArgumentType),
            (
                "{a, money}",
                SyntaxErrorKind::InvalidArgumentType("money".to_string()),
            ),
            ("{a, number, }", SyntaxErrorKind::ExpectedArgumentStyle),
            ("{n, plural, one {x}}", SyntaxErrorKind::MissingOtherClause),
            (
                "{n, plural, lots {x} other {y}}",
                SyntaxErrorKind::InvalidPluralSelector("lots".to_string()),
            ),
            (
                "{g, select, a {x} a {y} other {z}}",
                SyntaxErrorKind::DuplicateSelector("a".to_string()),
            ),
            ("{g, select, a x}", SyntaxErrorKind::ExpectedOptionBody),
            ("{g, select, }", SyntaxErrorKind::ExpectedSelector),
            ("{n, plural, offset:x other {y}}", SyntaxErrorKind::InvalidOffset),
        ];
        for (input, expected) in cases {
            let err = parse_message(input).unwrap_err();
            assert_eq!(err.kind, expected, "input: {input}");
        }
    }

    #[test]
    fn test_error_offset() {
        let err = parse_message("Hi {name").unwrap_err();
        assert_eq!(err.offset, 8);
    }
}
