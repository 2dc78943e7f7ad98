//! File helpers shared by both passes.

use std::fs;
use std::path::Path;

use crate::error::{MigrateError, Result};

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))
}

/// Overwrite `path`, creating its parent directory if needed.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MigrateError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| MigrateError::io(path, e))
}

/// Replace `path` via a sibling temp file and a rename, so readers never see
/// a half-written file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, contents).map_err(|e| MigrateError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        MigrateError::io(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theatreTemplates.ts");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("theatreTemplates.ts.tmp").exists());
    }

    #[test]
    fn write_text_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("life").join("receipt.ts");
        write_text(&path, "x").unwrap();
        write_text(&path, "y").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "y");
    }

    #[test]
    fn missing_input_names_the_path() {
        let err = read_text(Path::new("does/not/exist.ts")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.ts"));
    }
}
