//! Selected media files and MIME classification

use crate::error::IntakeError;
use crate::types::MediaKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file the user picked or dropped, held in memory for upload
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub path: Option<PathBuf>,
    pub mime: String,
    pub kind: MediaKind,
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, path: Option<PathBuf>, mime: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        let mime = mime.into();
        Self {
            name: name.into(),
            path,
            kind: MediaKind::from_mime(&mime),
            mime,
            bytes,
        }
    }

    /// Read a file chosen through the file dialog
    pub fn from_path(path: &Path) -> Result<Self, IntakeError> {
        let bytes = std::fs::read(path).map_err(|source| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = display_name(path);
        let mime = mime_for_name(&name);
        Ok(Self::new(name, Some(path.to_path_buf()), mime, bytes.into()))
    }

    /// Take a file dropped onto the window. Uses in-memory contents when the
    /// platform supplies them, otherwise reads from disk.
    pub fn from_dropped(file: &egui::DroppedFile) -> Result<Self, IntakeError> {
        let name = if !file.name.is_empty() {
            file.name.clone()
        } else if let Some(path) = &file.path {
            display_name(path)
        } else {
            String::new()
        };
        let mime = if file.mime.is_empty() {
            mime_for_name(&name).to_string()
        } else {
            file.mime.clone()
        };

        let bytes: Arc<[u8]> = match (&file.bytes, &file.path) {
            (Some(bytes), _) => bytes.clone(),
            (None, Some(path)) => std::fs::read(path)
                .map_err(|source| IntakeError::Read {
                    path: path.clone(),
                    source,
                })?
                .into(),
            (None, None) => return Err(IntakeError::NoContent(name)),
        };

        Ok(Self::new(name, file.path.clone(), mime, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// MIME type from a file name's extension; unknown extensions are octet-stream
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mime_follows_extension_case_insensitively() {
        assert_eq!(mime_for_name("beach.JPG"), "image/jpeg");
        assert_eq!(mime_for_name("clip.mov"), "video/quicktime");
        assert_eq!(mime_for_name("notes.txt"), "application/octet-stream");
        assert_eq!(mime_for_name("no_extension"), "application/octet-stream");
    }

    #[test]
    fn from_path_reads_and_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holiday.mp4");
        std::fs::File::create(&path).unwrap().write_all(b"fake video").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "holiday.mp4");
        assert_eq!(file.mime, "video/mp4");
        assert_eq!(file.kind, MediaKind::Video);
        assert_eq!(&*file.bytes, b"fake video");
        assert_eq!(file.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn zero_byte_and_unknown_files_are_accepted_as_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.dat");
        std::fs::File::create(&path).unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.size(), 0);
        assert_eq!(file.kind, MediaKind::Image);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::from_path(&dir.path().join("gone.png")).unwrap_err();
        assert!(matches!(err, IntakeError::Read { .. }));
    }

    #[test]
    fn dropped_file_prefers_declared_mime_and_inline_bytes() {
        let dropped = egui::DroppedFile {
            name: "reel.bin".to_string(),
            mime: "video/webm".to_string(),
            bytes: Some(Arc::from(&b"abc"[..])),
            ..Default::default()
        };
        let file = SelectedFile::from_dropped(&dropped).unwrap();
        assert_eq!(file.kind, MediaKind::Video);
        assert_eq!(file.mime, "video/webm");
        assert_eq!(&*file.bytes, b"abc");
    }

    #[test]
    fn dropped_file_without_mime_reads_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, b"png-ish").unwrap();
        let dropped = egui::DroppedFile {
            path: Some(path.clone()),
            ..Default::default()
        };

        let file = SelectedFile::from_dropped(&dropped).unwrap();
        assert_eq!(file.name, "cat.png");
        assert_eq!(file.mime, "image/png");
        assert_eq!(&*file.bytes, b"png-ish");
    }

    #[test]
    fn dropped_file_without_path_or_bytes_is_rejected() {
        let dropped = egui::DroppedFile {
            name: "ghost.png".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            SelectedFile::from_dropped(&dropped),
            Err(IntakeError::NoContent(_))
        ));
    }
}
