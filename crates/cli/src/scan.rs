//! Source discovery: list translatable video files in one directory.

use std::path::Path;

use vtbatch_core::job::JobSpec;

/// Extensions recognized as translatable video sources.
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "avi", "mov", "flv"];

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The configured video directory does not exist or is not a
    /// directory.
    #[error("folder not found: {0}")]
    DirNotFound(String),

    /// Listing the directory failed.
    #[error("failed to read directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Find video files directly inside `dir` (non-recursive), sorted by path
/// for a deterministic submission order.
///
/// Files whose extension is not on the allow-list are skipped, as are
/// subdirectories.
pub fn find_video_files(dir: &Path) -> Result<Vec<JobSpec>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirNotFound(dir.display().to_string()));
    }

    let mut specs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let recognized = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| VIDEO_EXTENSIONS.iter().any(|v| e.eq_ignore_ascii_case(v)))
            .unwrap_or(false);
        if recognized {
            specs.push(JobSpec::new(path));
        }
    }
    specs.sort_by(|a, b| a.source.cmp(&b.source));
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).expect("should create test file");
    }

    #[test]
    fn unrelated_files_are_filtered_out() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        touch(dir.path(), "a.mp4");
        touch(dir.path(), "b.mkv");
        touch(dir.path(), "notes.txt");

        let specs = find_video_files(dir.path()).expect("scan should succeed");
        let names: Vec<_> = specs.iter().map(JobSpec::source_name).collect();
        assert_eq!(names, ["a.mp4", "b.mkv"]);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        touch(dir.path(), "upper.MP4");
        touch(dir.path(), "mixed.MoV");

        let specs = find_video_files(dir.path()).expect("scan should succeed");
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn subdirectories_are_ignored() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::create_dir(dir.path().join("nested.mp4")).expect("should create subdir");
        touch(dir.path(), "real.mp4");

        let specs = find_video_files(dir.path()).expect("scan should succeed");
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].source_name(), "real.mp4");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = find_video_files(Path::new("/definitely/not/here"));
        assert!(matches!(err, Err(ScanError::DirNotFound(_))));
    }

    #[test]
    fn empty_directory_yields_no_specs() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let specs = find_video_files(dir.path()).expect("scan should succeed");
        assert!(specs.is_empty());
    }
}
