//! File name rules for items.

use crate::error::{TreeError, TreeResult};

/// Extension given to request files.
pub const REQUEST_EXTENSION: &str = "json";

/// Metadata file names that items may not take.
pub const RESERVED_FILENAMES: &[&str] = &["collection.json", "folder.json"];

/// Resolves a user-supplied name into a request file name.
///
/// Surrounding whitespace is trimmed and `.json` is appended when missing.
///
/// # Errors
/// Returns `TreeError::InvalidName` for blank or hidden names, names
/// containing a path separator and reserved metadata names.
pub fn request_filename(name: &str) -> TreeResult<String> {
    let trimmed = validate_segment(name)?;
    let suffix = format!(".{REQUEST_EXTENSION}");
    let filename = if trimmed.ends_with(&suffix) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{suffix}")
    };

    if RESERVED_FILENAMES.contains(&filename.as_str()) {
        return Err(TreeError::InvalidName(filename));
    }
    Ok(filename)
}

/// Resolves a user-supplied name into a folder directory name.
///
/// # Errors
/// Returns `TreeError::InvalidName` for blank or hidden names, reserved
/// metadata names and names containing a path separator.
pub fn folder_dirname(name: &str) -> TreeResult<String> {
    let trimmed = validate_segment(name)?;
    if RESERVED_FILENAMES.contains(&trimmed) {
        return Err(TreeError::InvalidName(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Hidden entries (leading `.`) are never loaded back from disk.
fn validate_segment(name: &str) -> TreeResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.starts_with('.') || trimmed.contains(['/', '\\']) {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}
