//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Absolute names are returned as-is when they exist.
///
/// # Example
/// ```text
/// /home/user/app/public/css/     ← start
/// /home/user/app/circumflex.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_upward() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("public/css");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("circumflex.toml"), "").unwrap();

        let found = find_config_file(Path::new("circumflex.toml"), &nested).unwrap();
        assert_eq!(found, temp.path().join("circumflex.toml"));
    }

    #[test]
    fn test_find_config_file_absolute_missing() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert_eq!(find_config_file(&missing, temp.path()), None);
    }
}
