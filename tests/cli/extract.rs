use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

const APP: &str = r#"import { Component } from "react";
import { FormattedMessage, defineMessages, translate } from "react-intl";

export const messages = defineMessages({
  title: { id: "app.title", description: "Page heading", defaultMessage: "Welcome" },
});

export class App extends Component {
  render() {
    return (
      <div title={translate("app.tooltip")}>
        <FormattedMessage id="app.greeting" defaultMessage="Hello, { name }!" values={{ name: "Ada" }} />
      </div>
    );
  }
}
"#;

fn catalog_ids(content: &str) -> Result<Vec<String>> {
    let parsed: Value = serde_json::from_str(content)?;
    Ok(parsed
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default())
}

#[test]
fn test_extract_writes_catalog() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file(".intlxrc.json", r#"{ "messagesDir": "build/messages" }"#)?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert_eq!(result.stdout, "✓ Extracted 3 messages from 1 file\n");

    let content = test.read_file("build/messages/src/App.json")?;
    assert_eq!(
        catalog_ids(&content)?,
        vec!["app.greeting", "app.title", "app.tooltip"]
    );

    let catalog: Value = serde_json::from_str(&content)?;
    assert_eq!(catalog[0]["defaultMessage"], "Hello, {name}!");
    assert_eq!(catalog[1]["description"], "Page heading");
    assert!(catalog[2].get("defaultMessage").is_none());

    Ok(())
}

#[test]
fn test_extract_without_messages_dir_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "✓ Extracted 3 messages from 1 file\n");
    assert!(!test.root().join("build").exists());

    Ok(())
}

#[test]
fn test_messages_dir_flag_overrides_config() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file(".intlxrc.json", r#"{ "messagesDir": "build/messages" }"#)?;

    let result = run({
        let mut cmd = test.extract_command();
        cmd.args(["--messages-dir", "i18n/catalogs"]);
        cmd
    })?;

    assert_eq!(result.code, Some(0));
    assert!(test.root().join("i18n/catalogs/src/App.json").exists());
    assert!(!test.root().join("build").exists());

    Ok(())
}

#[test]
fn test_catalogs_mirror_paths_under_source_root() -> Result<()> {
    let test = CliTest::with_file("web/src/App.tsx", APP)?;
    test.write_file("web/.intlxrc.json", r#"{ "messagesDir": "build/messages" }"#)?;

    let result = run({
        let mut cmd = test.extract_command();
        cmd.args(["--source-root", "web"]);
        cmd
    })?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(test.root().join("web/build/messages/src/App.json").exists());
    assert!(!test.root().join("build").exists());
    assert!(!test.root().join("web/build/messages/web").exists());

    Ok(())
}

#[test]
fn test_transform_error_fails_the_run() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file(".intlxrc.json", r#"{ "messagesDir": "out" }"#)?;
    test.write_file(
        "src/Bad.tsx",
        r#"import { translate } from "react-intl";
export const label = translate();
"#,
    )?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(1));
    assert!(result.stdout.contains("error: "));
    assert!(result.stdout.contains("missing-id"));
    assert!(result.stdout.contains("src/Bad.tsx:2:22"));
    assert!(result.stdout.contains("✘ 1 problems (1 error, 0 warnings)"));
    assert!(!result.stdout.contains("Extracted"));

    // Other files are still processed.
    assert!(test.root().join("out/src/App.json").exists());
    assert!(!test.root().join("out/src/Bad.json").exists());

    Ok(())
}

#[test]
fn test_duplicate_conflict_is_reported() -> Result<()> {
    let test = CliTest::with_file(
        "src/Dup.tsx",
        r#"import { FormattedMessage } from "react-intl";
export const a = <FormattedMessage id="dup" defaultMessage="One" />;
export const b = <FormattedMessage id="dup" defaultMessage="Two" />;
"#,
    )?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(1));
    assert!(result.stdout.contains("duplicate-id"));
    assert!(result.stdout.contains("src/Dup.tsx:3:18"));

    Ok(())
}

#[test]
fn test_parse_error_is_reported() -> Result<()> {
    let test = CliTest::with_file("src/Broken.tsx", "export const = ;")?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(1));
    assert!(result.stdout.contains("parse-error"));
    assert!(result.stderr.contains("1 file(s) could not be parsed"));

    Ok(())
}

#[test]
fn test_deprecated_component_is_a_warning() -> Result<()> {
    let test = CliTest::with_file(
        "src/Legacy.tsx",
        r#"import { FormattedHTMLMessage } from "react-intl";
export const legacy = <FormattedHTMLMessage id="legacy" defaultMessage="<b>Hi</b>" />;
"#,
    )?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("warning: `FormattedHTMLMessage` is deprecated"));
    assert!(result.stdout.contains("deprecated-component"));
    assert!(result.stdout.contains("✘ 1 problems (0 errors, 1 warning)"));
    assert!(result.stdout.ends_with("✓ Extracted 0 messages from 1 file\n"));

    Ok(())
}

#[test]
fn test_test_files_are_skipped() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file(
        "src/App.test.tsx",
        r#"import { translate } from "react-intl";
translate();
"#,
    )?;
    test.write_file("src/types.d.ts", "export declare const x: number;")?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "✓ Extracted 3 messages from 1 file\n");

    Ok(())
}

#[test]
fn test_config_options_are_applied() -> Result<()> {
    let test = CliTest::with_file(
        "src/Nav.tsx",
        r#"import { FormattedMessage } from "../i18n";
export const home = <FormattedMessage id="nav.home" />;
"#,
    )?;
    test.write_file(
        ".intlxrc.json",
        r#"{ "markupMode": "attribute", "enforceDescriptions": true }"#,
    )?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(1));
    assert!(result.stdout.contains("description-required"));
    assert!(result.stdout.contains("enforceDescriptions"));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file(".intlxrc.json", "{ not json")?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.starts_with("Error: Failed to parse config file"));

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let result = run(test.command())?;

    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("extract"));
    assert!(result.stdout.contains("init"));

    Ok(())
}
