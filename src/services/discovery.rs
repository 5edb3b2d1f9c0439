//! File Discovery
//!
//! Resolves the configured root path into the ordered list of files a
//! batch run analyzes. Walking is gitignore-aware; the config's extension
//! and ignored-pattern filters are applied on top.

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;

use crate::models::settings::ReviewConfig;
use crate::utils::error::{AppError, AppResult};

/// Discover the files covered by `config`, sorted by path.
pub fn discover_files(config: &ReviewConfig) -> AppResult<Vec<PathBuf>> {
    let root = Path::new(&config.path);
    if !root.exists() {
        return Err(AppError::not_found(format!(
            "Path '{}' does not exist",
            config.path
        )));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let ignored = compile_patterns(config.ignored_patterns.as_deref())?;
    let extensions: Option<Vec<String>> = config
        .extensions
        .as_ref()
        .map(|exts| exts.iter().map(|e| e.to_ascii_lowercase()).collect());

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .follow_links(false)
        .git_ignore(true)
        .git_exclude(true)
        .git_global(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let rel_norm = rel.to_string_lossy().replace('\\', "/");
        if rel_norm.is_empty() {
            continue;
        }

        if let Some(extensions) = &extensions {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase());
            match ext {
                Some(ext) if extensions.contains(&ext) => {}
                _ => continue,
            }
        }

        if ignored.iter().any(|p| p.matches(&rel_norm)) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn compile_patterns(patterns: Option<&[String]>) -> AppResult<Vec<Pattern>> {
    patterns
        .unwrap_or(&[])
        .iter()
        .map(|p| {
            Pattern::new(p)
                .map_err(|e| AppError::validation(format!("Invalid ignore pattern '{}': {}", p, e)))
        })
        .collect()
}
