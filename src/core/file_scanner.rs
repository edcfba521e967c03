use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::{DirEntry, WalkDir};

use crate::config::{Config, TEST_FILE_PATTERNS};

/// Which source files an extraction run visits.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub includes: Vec<String>,
    pub ignores: Vec<String>,
    pub ignore_test_files: bool,
    pub verbose: bool,
}

impl ScanOptions {
    pub fn from_config(config: &Config, verbose: bool) -> Self {
        Self {
            includes: config.includes.clone(),
            ignores: config.ignores.clone(),
            ignore_test_files: config.ignore_test_files,
            verbose,
        }
    }
}

/// Result of scanning files.
pub struct ScanResult {
    /// Sorted, without duplicates from overlapping includes.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Patterns without `*` or `?` are literal paths relative to the base dir.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

struct IgnoreRules {
    literal_paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl IgnoreRules {
    fn new(base_dir: &Path, options: &ScanOptions) -> Self {
        let mut literal_paths = Vec::new();
        let mut patterns = Vec::new();

        for ignore in &options.ignores {
            if !is_glob_pattern(ignore) {
                literal_paths.push(base_dir.join(ignore));
                continue;
            }
            match Pattern::new(ignore) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) if options.verbose => eprintln!(
                    "{} Invalid ignore pattern '{}': {}",
                    "warning:".bold().yellow(),
                    ignore,
                    e
                ),
                Err(_) => {}
            }
        }

        if options.ignore_test_files {
            patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }

        Self {
            literal_paths,
            patterns,
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.literal_paths.iter().any(|ignored| path.starts_with(ignored))
            || self.patterns.iter().any(|p| p.matches(&path_str))
    }
}

fn roots_to_scan(base_dir: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    if options.includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut roots = Vec::new();
    for include in &options.includes {
        let path = base_dir.join(include);
        if is_glob_pattern(include) {
            match glob(&path.to_string_lossy()) {
                Ok(entries) => roots.extend(entries.flatten().filter(|entry| entry.is_dir())),
                Err(e) if options.verbose => eprintln!(
                    "{} Invalid glob pattern '{}': {}",
                    "warning:".bold().yellow(),
                    include,
                    e
                ),
                Err(_) => {}
            }
        } else if path.exists() {
            roots.push(path);
        } else if options.verbose {
            eprintln!(
                "{} Include path does not exist: {}",
                "warning:".bold().yellow(),
                path.display()
            );
        }
    }
    roots
}

/// Collect the JS/TS sources under `base_dir`.
///
/// Ignored directories are pruned rather than walked.
pub fn scan_source_files(base_dir: &Path, options: &ScanOptions) -> ScanResult {
    let rules = IgnoreRules::new(base_dir, options);
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    for root in roots_to_scan(base_dir, options) {
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !rules.is_ignored(entry.path()));

        for entry in walker {
            match entry {
                Ok(entry) if is_source_file(&entry) => {
                    files.insert(entry.path().to_string_lossy().into_owned());
                }
                Ok(_) => {}
                Err(e) => {
                    skipped_count += 1;
                    if options.verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                }
            }
        }
    }

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

fn is_source_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && is_scannable_path(entry.path())
}

/// `.d.ts` declaration files carry no messages.
fn is_scannable_path(path: &Path) -> bool {
    let is_declaration = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".d.ts"));
    !is_declaration
        && matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("tsx" | "ts" | "jsx" | "js")
        )
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names(result: &ScanResult, base: &Path) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| {
                Path::new(f)
                    .strip_prefix(base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_source_files_sorted() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        fs::create_dir(base.join("components")).unwrap();
        File::create(base.join("components/Button.tsx")).unwrap();
        File::create(base.join("app.jsx")).unwrap();
        File::create(base.join("style.css")).unwrap();
        File::create(base.join("global.d.ts")).unwrap();

        let result = scan_source_files(base, &ScanOptions::default());

        assert_eq!(names(&result, base), vec!["app.jsx", "components/Button.tsx"]);
    }

    #[test]
    fn test_scan_prunes_ignored_dirs() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("node_modules/pkg")).unwrap();
        File::create(base.join("node_modules/pkg/index.js")).unwrap();
        fs::create_dir(base.join("generated")).unwrap();
        File::create(base.join("generated/messages.ts")).unwrap();
        File::create(base.join("app.tsx")).unwrap();

        let options = ScanOptions {
            ignores: vec!["**/node_modules".to_string(), "generated".to_string()],
            ..Default::default()
        };
        let result = scan_source_files(base, &options);

        assert_eq!(names(&result, base), vec!["app.tsx"]);
    }

    #[test]
    fn test_scan_ignores_test_files() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        File::create(base.join("app.tsx")).unwrap();
        File::create(base.join("app.test.tsx")).unwrap();
        fs::create_dir(base.join("__tests__")).unwrap();
        File::create(base.join("__tests__/helper.ts")).unwrap();

        let options = ScanOptions {
            ignore_test_files: true,
            ..Default::default()
        };
        assert_eq!(names(&scan_source_files(base, &options), base), vec!["app.tsx"]);

        let all = scan_source_files(base, &ScanOptions::default());
        assert_eq!(all.files.len(), 3);
    }

    #[test]
    fn test_scan_with_overlapping_includes() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("src/components")).unwrap();
        File::create(base.join("src/components/Button.tsx")).unwrap();
        fs::create_dir(base.join("lib")).unwrap();
        File::create(base.join("lib/utils.ts")).unwrap();

        let options = ScanOptions {
            includes: vec![
                "src".to_string(),
                "src/components".to_string(),
                "missing".to_string(),
            ],
            ..Default::default()
        };
        let result = scan_source_files(base, &options);

        assert_eq!(names(&result, base), vec!["src/components/Button.tsx"]);
    }

    #[test]
    fn test_scan_with_glob_include() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("packages/a/src")).unwrap();
        File::create(base.join("packages/a/src/index.tsx")).unwrap();
        fs::create_dir_all(base.join("packages/b/src")).unwrap();
        File::create(base.join("packages/b/src/index.tsx")).unwrap();

        let options = ScanOptions {
            includes: vec!["packages/*/src".to_string()],
            ..Default::default()
        };
        let result = scan_source_files(base, &options);

        assert_eq!(
            names(&result, base),
            vec!["packages/a/src/index.tsx", "packages/b/src/index.tsx"]
        );
    }

    #[test]
    fn test_is_scannable_path() {
        assert!(is_scannable_path(Path::new("app.tsx")));
        assert!(is_scannable_path(Path::new("app.js")));
        assert!(!is_scannable_path(Path::new("types.d.ts")));
        assert!(!is_scannable_path(Path::new("data.json")));
    }
}
