//! Output writers for reports and flamegraphs.
//!
//! This module handles:
//! - Common-prefix compression of the call tree
//! - JSON reports
//! - Indented text reports
//! - SVG flamegraphs

pub mod compress;
pub mod json;
pub mod svg;
pub mod text;

// Re-export main functions
pub use compress::{common_prefix, compress, to_report, CompressedStats};
pub use json::{read_report, report_to_string, write_report};
pub use svg::write_svg;
pub use text::{render_text_report, write_text_report};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create the parent directory of an output file if it is missing
fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
