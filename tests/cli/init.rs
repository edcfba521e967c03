use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .intlxrc.json

    ----- stderr -----
    ");

    let content = test.read_file(".intlxrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["includes"], serde_json::json!(["src"]));
    assert_eq!(parsed["markupMode"], "descriptor");
    assert_eq!(parsed["wrapperFunction"], "injectIntl");
    assert!(content.contains("\n  \""), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_with_messages_dir() -> Result<()> {
    let test = CliTest::new()?;

    let result = run({
        let mut cmd = test.command();
        cmd.args(["init", "--messages-dir", "build/messages"]);
        cmd
    })?;

    assert_eq!(result.code, Some(0));
    let parsed: Value = serde_json::from_str(&test.read_file(".intlxrc.json")?)?;
    assert_eq!(parsed["messagesDir"], "build/messages");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".intlxrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: ./.intlxrc.json already exists
    ");
    assert_eq!(test.read_file(".intlxrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file(
        "src/App.tsx",
        r#"import { FormattedMessage } from "react-intl";
export const app = <FormattedMessage id="app" defaultMessage="App" />;
"#,
    )?;

    let result = run(test.extract_command())?;
    assert_eq!(
        result.code,
        Some(0),
        "Extract should work with initialized config. stderr: {}",
        result.stderr
    );

    Ok(())
}
