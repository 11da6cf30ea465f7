//! Utility helpers: data paths and output file naming.

use std::path::{Path, PathBuf};

/// Get the fmmaker data directory (e.g. `~/.fmmaker/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".fmmaker")
}

/// Default settings file (e.g. `~/.fmmaker/settings.json`).
pub fn get_settings_path() -> PathBuf {
    get_data_path().join("settings.json")
}

/// Default model cache file (e.g. `~/.fmmaker/model_cache.json`).
pub fn get_model_cache_path() -> PathBuf {
    get_data_path().join("model_cache.json")
}

/// Output file name for an input file: its base name without extension, plus `ext`.
///
/// `notes/chapter.one.txt` with `"md"` becomes `chapter.one.md`.
pub fn output_file_name(input: &Path, ext: &str) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    format!("{stem}.{ext}")
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name_strips_extension() {
        assert_eq!(output_file_name(Path::new("/tmp/notes.txt"), "md"), "notes.md");
    }

    #[test]
    fn test_output_file_name_keeps_inner_dots() {
        assert_eq!(
            output_file_name(Path::new("docs/chapter.one.txt"), "md"),
            "chapter.one.md"
        );
    }

    #[test]
    fn test_output_file_name_without_extension() {
        assert_eq!(output_file_name(Path::new("README"), "md"), "README.md");
    }

    #[test]
    fn test_data_paths() {
        assert!(get_data_path().ends_with(".fmmaker"));
        assert!(get_settings_path().ends_with("settings.json"));
        assert!(get_model_cache_path().parent().unwrap().ends_with(".fmmaker"));
    }
}
