use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a file into a string, with the resolved path in any error.
pub fn read_text(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    Ok(contents)
}

/// Read a JSON file as a generic serde_json::Value.
pub fn read_json_value(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let contents = read_text(path)?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    Ok(value)
}

/// Resolve a path against the working directory and require a regular file.
pub fn resolve_path(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let canonical = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
