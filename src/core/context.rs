//! Parallel per-file extraction pipeline.
//!
//! `ExtractContext` resolves the configuration and the file list once, then
//! [`ExtractContext::run`] reads, parses and transforms every file on the
//! rayon pool. Each file gets its own `SourceMap` and its own transform
//! session, so nothing is shared between workers except the config.

use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result};
use rayon::prelude::*;
use swc_common::SourceMap;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        FileContext, FileResult, TransformError,
        file_scanner::{ScanOptions, scan_source_files},
        parsers::jsx::parse_jsx_source,
        transform_module,
    },
    issues::{DeprecatedComponentIssue, Issue, ParseErrorIssue, TransformIssue},
};

/// Why a file produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFailure {
    Parse(String),
    Transform(TransformError),
}

/// Outcome of one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub file_path: String,
    /// Original text, kept for report source lines.
    pub source: String,
    pub result: Result<FileResult, FileFailure>,
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    pub fn message_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.messages.len())
    }

    pub fn issues(&self) -> Vec<Issue> {
        match &self.result {
            Ok(result) => result
                .warnings
                .iter()
                .map(|w| DeprecatedComponentIssue::from_warning(w, &self.source).into())
                .collect(),
            Err(FileFailure::Transform(error)) => {
                vec![TransformIssue::new(error.clone(), &self.source).into()]
            }
            Err(FileFailure::Parse(error)) => vec![
                ParseErrorIssue {
                    file_path: self.file_path.clone(),
                    error: error.clone(),
                }
                .into(),
            ],
        }
    }
}

pub struct ExtractContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,
    /// Directory catalogs are mirrored relative to.
    pub root_dir: PathBuf,
    /// Source files, sorted.
    pub files: Vec<String>,
    /// Paths the scanner could not read.
    pub skipped_count: usize,
    pub verbose: bool,
}

impl ExtractContext {
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;
        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&root_dir)?;
        if verbose && !config_result.from_file {
            eprintln!("Note: No {CONFIG_FILE_NAME} found, using default configuration");
        }
        let mut config = config_result.config;

        if let Some(messages_dir) = &common_args.messages_dir {
            config.messages_dir = Some(messages_dir.to_string_lossy().into_owned());
        }
        config.messages_dir = config
            .messages_dir
            .as_deref()
            .map(|dir| resolve_relative(&root_dir, dir).to_string_lossy().into_owned());

        let scan_root = resolve_relative(&root_dir, &config.source_root);
        let scan = scan_source_files(&scan_root, &ScanOptions::from_config(&config, verbose));
        if verbose {
            eprintln!(
                "Note: scanning {} source file(s) under {}",
                scan.files.len(),
                scan_root.display()
            );
        }

        Ok(Self {
            config,
            root_dir,
            files: scan.files,
            skipped_count: scan.skipped_count,
            verbose,
        })
    }

    /// Transform every file. IO failures abort the run; parse and
    /// transform failures are recorded per file.
    pub fn run(&self) -> Result<Vec<FileOutcome>> {
        self.files
            .par_iter()
            .map(|file_path| self.process_file(file_path))
            .collect()
    }

    fn process_file(&self, file_path: &str) -> Result<FileOutcome> {
        let source = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {file_path}"))?;

        let source_map = Arc::new(SourceMap::default());
        let mut parsed = match parse_jsx_source(source.clone(), file_path, source_map) {
            Ok(parsed) => parsed,
            Err(e) => {
                if self.verbose {
                    eprintln!("Warning: {} - {}", file_path, e);
                }
                return Ok(FileOutcome {
                    file_path: file_path.to_string(),
                    source,
                    result: Err(FileFailure::Parse(e.to_string())),
                });
            }
        };

        let file = FileContext::new(file_path, self.root_dir.clone(), parsed.source_map.clone());
        let result = match transform_module(&mut parsed.module, &file, &self.config) {
            Ok(result) => {
                if self.verbose
                    && let Some(catalog) = &result.catalog_path
                {
                    eprintln!("Note: wrote {}", catalog.display());
                }
                Ok(result)
            }
            Err(e) => match e.downcast::<TransformError>() {
                Ok(error) => Err(FileFailure::Transform(error)),
                Err(e) => return Err(e),
            },
        };

        Ok(FileOutcome {
            file_path: file_path.to_string(),
            source,
            result,
        })
    }
}

/// Join `path` onto `root_dir`, keeping relative paths short when the root
/// is the current directory.
fn resolve_relative(root_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let is_cur_dir = root_dir
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if is_cur_dir {
        p.to_path_buf()
    } else {
        let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
        root_dir.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::issues::Rule;

    fn common_args(root: &Path) -> CommonArgs {
        CommonArgs {
            source_root: Some(root.to_path_buf()),
            messages_dir: None,
            verbose: false,
        }
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_relative(Path::new("."), "./messages"),
            PathBuf::from("./messages")
        );
        assert_eq!(
            resolve_relative(Path::new("/repo"), "./messages"),
            PathBuf::from("/repo/messages")
        );
        assert_eq!(
            resolve_relative(Path::new("/repo"), "/abs/out"),
            PathBuf::from("/abs/out")
        );
    }

    #[test]
    fn test_run_collects_outcomes_per_file() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(
            root.join("src/Good.tsx"),
            r#"import { FormattedMessage } from "react-intl";
export const Good = () => {
  return <FormattedMessage id="good.title" defaultMessage="Good" />;
};
"#,
        )
        .unwrap();
        fs::write(root.join("src/Broken.tsx"), "export const = ;").unwrap();
        fs::write(
            root.join("src/Bad.tsx"),
            r#"import { FormattedMessage } from "react-intl";
const id = window.location.hash;
export const view = <FormattedMessage id={id} defaultMessage="x" />;
"#,
        )
        .unwrap();

        let ctx = ExtractContext::new(&common_args(root)).unwrap();
        assert_eq!(ctx.files.len(), 3);

        let outcomes = ctx.run().unwrap();
        let by_name = |name: &str| {
            outcomes
                .iter()
                .find(|o| o.file_path.ends_with(name))
                .unwrap()
        };

        assert_eq!(by_name("Good.tsx").message_count(), 1);
        assert!(matches!(
            by_name("Broken.tsx").result,
            Err(FileFailure::Parse(_))
        ));

        let bad = by_name("Bad.tsx");
        let issues = bad.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(
            crate::issues::Report::report_rule(&issues[0]),
            Rule::StaticEvaluation
        );
    }

    #[test]
    fn test_messages_dir_override_is_resolved_against_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(
            root.join("src/App.tsx"),
            r#"import { defineMessages } from "react-intl";
export const messages = defineMessages({
  title: { id: "app.title", defaultMessage: "App" },
});
"#,
        )
        .unwrap();

        let mut args = common_args(root);
        args.messages_dir = Some(PathBuf::from("build/messages"));
        let ctx = ExtractContext::new(&args).unwrap();
        assert_eq!(
            ctx.config.messages_dir.as_deref().map(PathBuf::from),
            Some(root.join("build/messages"))
        );

        let outcomes = ctx.run().unwrap();
        assert!(outcomes.iter().all(|o| !o.is_failure()));
        let catalog = fs::read_to_string(root.join("build/messages/src/App.json")).unwrap();
        assert!(catalog.contains("\"app.title\""));
    }
}
