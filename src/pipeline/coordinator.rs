//! Pipeline coordination for file processing.

use crate::config::OutputFormat;
use crate::constants::{AUDIO_EXTENSIONS, FRAME_FILE_SUFFIX, output_extensions};
use crate::error::Result;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for processing a single file.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Output directory (None = same as input).
    pub output_dir: Option<PathBuf>,
    /// Output formats to generate.
    pub formats: Vec<OutputFormat>,
    /// Force reprocessing even if output exists.
    pub force: bool,
    /// Prefix CSV output with a UTF-8 BOM.
    pub csv_bom: bool,
    /// Print CSV rows to stdout instead of writing files.
    pub stdout: bool,
}

/// Result of checking whether a file should be processed.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessCheck {
    /// File should be processed.
    Process,
    /// Skip - output already exists.
    SkipExists,
}

/// What an input file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Encoded audio to decode and extract frames from.
    Audio,
    /// Pre-extracted `frequency,intensity` frames.
    Frames,
}

impl InputKind {
    /// Classify a path by name, or `None` if it is not a supported input.
    pub fn of(path: &Path) -> Option<Self> {
        if is_frame_file(path) {
            Some(Self::Frames)
        } else if is_audio_file(path) {
            Some(Self::Audio)
        } else {
            None
        }
    }
}

/// Determine the output directory for a file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Get output file path for a given format.
///
/// Frame files lose their whole `.frames.csv` suffix, so `a.frames.csv` and
/// `a.wav` both map to `a.speeds.csv`.
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let extension = match format {
        OutputFormat::Csv => output_extensions::CSV,
        OutputFormat::Json => output_extensions::JSON,
    };

    output_dir.join(format!("{}{extension}", output_stem(input)))
}

fn output_stem(input: &Path) -> Cow<'_, str> {
    if let Some(name) = input.file_name().map(|n| n.to_string_lossy())
        && let Some(stem) = strip_suffix_ignore_case(&name, FRAME_FILE_SUFFIX)
        && !stem.is_empty()
    {
        return Cow::Owned(stem.to_string());
    }

    input
        .file_stem()
        .map_or(Cow::Borrowed("output"), |s| s.to_string_lossy())
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    let tail = name.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &name[..split])
}

/// Check if a file should be processed.
pub fn should_process(
    input: &Path,
    output_dir: &Path,
    formats: &[OutputFormat],
    force: bool,
) -> ProcessCheck {
    if !force {
        let all_exist = formats
            .iter()
            .all(|fmt| output_path_for(input, output_dir, *fmt).exists());
        if all_exist {
            return ProcessCheck::SkipExists;
        }
    }

    ProcessCheck::Process
}

/// Collect input files from paths (files and directories).
///
/// Directory contents are returned sorted so runs are reproducible.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if InputKind::of(path).is_some() {
                files.push(path.clone());
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_input_files_recursive(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

/// Recursively collect supported files from a directory.
fn collect_input_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_input_files_recursive(&path, files)?;
        } else if InputKind::of(&path).is_some() {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file is a supported audio format.
fn is_audio_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        AUDIO_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(OsStr::new(known)))
    })
}

/// Check if a file holds pre-extracted frames.
fn is_frame_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .is_some_and(|name| strip_suffix_ignore_case(&name, FRAME_FILE_SUFFIX).is_some())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir_for_with_explicit() {
        let input = Path::new("/data/audio.wav");
        let output = output_dir_for(input, Some(Path::new("/results")));
        assert_eq!(output, PathBuf::from("/results"));
    }

    #[test]
    fn test_output_dir_for_without_explicit() {
        let input = Path::new("/data/audio.wav");
        let output = output_dir_for(input, None);
        assert_eq!(output, PathBuf::from("/data"));
    }

    #[test]
    fn test_output_path_for_formats() {
        let csv = output_path_for(Path::new("road.wav"), Path::new("/out"), OutputFormat::Csv);
        assert_eq!(csv, PathBuf::from("/out/road.speeds.csv"));

        let json = output_path_for(Path::new("road.wav"), Path::new("/out"), OutputFormat::Json);
        assert_eq!(json, PathBuf::from("/out/road.speeds.json"));
    }

    #[test]
    fn test_output_path_for_frame_file_strips_suffix() {
        let path = output_path_for(
            Path::new("/data/road.frames.csv"),
            Path::new("/out"),
            OutputFormat::Csv,
        );
        assert_eq!(path, PathBuf::from("/out/road.speeds.csv"));
    }

    #[test]
    fn test_input_kind() {
        assert_eq!(InputKind::of(Path::new("test.wav")), Some(InputKind::Audio));
        assert_eq!(InputKind::of(Path::new("test.FLAC")), Some(InputKind::Audio));
        assert_eq!(InputKind::of(Path::new("test.mp3")), Some(InputKind::Audio));
        assert_eq!(
            InputKind::of(Path::new("test.frames.csv")),
            Some(InputKind::Frames)
        );
        assert_eq!(
            InputKind::of(Path::new("test.Frames.CSV")),
            Some(InputKind::Frames)
        );
        assert_eq!(InputKind::of(Path::new("test.speeds.csv")), None);
        assert_eq!(InputKind::of(Path::new("test.txt")), None);
    }

    #[test]
    fn test_is_audio_file_with_unicode() {
        assert!(is_audio_file(Path::new("ääni_tiedostö.wav")));
        assert!(is_audio_file(Path::new("テスト.wav")));
    }

    #[test]
    fn test_should_process_skips_when_outputs_exist() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("road.wav");
        let formats = [OutputFormat::Csv];

        assert_eq!(
            should_process(&input, dir.path(), &formats, false),
            ProcessCheck::Process
        );

        std::fs::write(dir.path().join("road.speeds.csv"), "").unwrap();
        assert_eq!(
            should_process(&input, dir.path(), &formats, false),
            ProcessCheck::SkipExists
        );
        assert_eq!(
            should_process(&input, dir.path(), &formats, true),
            ProcessCheck::Process
        );
        assert_eq!(
            should_process(&input, dir.path(), &[OutputFormat::Csv, OutputFormat::Json], false),
            ProcessCheck::Process
        );
    }

    #[test]
    fn test_collect_input_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        for name in ["b.wav", "a.frames.csv", "a.speeds.csv", "notes.txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::write(nested.join("c.flac"), "").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.frames.csv", "b.wav", "nested/c.flac"]);
    }
}
