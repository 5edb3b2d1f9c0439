//! Cross-Platform Path Utilities
//!
//! Functions for resolving the engine's durable-state directories.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Vigil directory (~/.vigil/)
pub fn vigil_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".vigil"))
}

/// Get the run-state directory (~/.vigil/runs/)
pub fn runs_dir() -> AppResult<PathBuf> {
    Ok(vigil_dir()?.join("runs"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the run-state directory, creating it if it doesn't exist
pub fn ensure_runs_dir() -> AppResult<PathBuf> {
    let path = runs_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
