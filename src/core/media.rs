//! Media staging for job postings.
//!
//! Selected files are held together with a preview URL until they are uploaded
//! or discarded. Each preview is owned by a [`PreviewHandle`] that revokes the
//! URL when dropped, so removing an entry, disposing the area or dropping it
//! releases every preview exactly once.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

/// Creates and releases preview URLs for staged files.
pub trait PreviewProvider: Send + Sync {
    /// Produce a preview URL. Must not fail; degrade instead.
    fn create(&self, file: &StagedFile) -> String;

    /// Release a URL previously returned by [`PreviewProvider::create`].
    fn revoke(&self, url: &str);
}

/// Owning handle for one preview URL.
pub struct PreviewHandle {
    url: String,
    provider: Arc<dyn PreviewProvider>,
}

impl PreviewHandle {
    fn new(file: &StagedFile, provider: Arc<dyn PreviewProvider>) -> Self {
        let url = provider.create(file);
        Self { url, provider }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.provider.revoke(&self.url);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}

/// A user-selected file waiting for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl StagedFile {
    /// Stage a file from disk, reading its size and guessing its MIME type.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self {
            mime_type: mime_for(&file_name).to_string(),
            path: path.to_path_buf(),
            file_name,
            size: metadata.len(),
        })
    }
}

/// MIME type from a file extension; unknown extensions are sent as octet-stream.
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// A staged file and its live preview.
#[derive(Debug)]
pub struct StagedMedia {
    pub file: StagedFile,
    preview: PreviewHandle,
}

impl StagedMedia {
    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }
}

/// Ordered, append-only list of staged files.
pub struct MediaStagingArea {
    entries: Vec<StagedMedia>,
    provider: Arc<dyn PreviewProvider>,
}

impl MediaStagingArea {
    pub fn new(provider: Arc<dyn PreviewProvider>) -> Self {
        Self {
            entries: Vec::new(),
            provider,
        }
    }

    /// Append files in order, creating a preview for each.
    pub fn add(&mut self, files: impl IntoIterator<Item = StagedFile>) {
        for file in files {
            let preview = PreviewHandle::new(&file, Arc::clone(&self.provider));
            tracing::debug!(file = %file.file_name, url = %preview.url(), "Staged media file");
            self.entries.push(StagedMedia { file, preview });
        }
    }

    /// Remove the entry at `index`, revoking its preview. Later entries shift down.
    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        if index >= self.entries.len() {
            return None;
        }
        let StagedMedia { file, preview } = self.entries.remove(index);
        drop(preview);
        Some(file)
    }

    /// Revoke every preview and empty the area.
    pub fn dispose_all(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(count = self.entries.len(), "Disposing staged media");
        }
        self.entries.clear();
    }

    pub fn entries(&self) -> &[StagedMedia] {
        &self.entries
    }

    /// Copies of the staged files, in order, for upload.
    pub fn files(&self) -> Vec<StagedFile> {
        self.entries.iter().map(|e| e.file.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for MediaStagingArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStagingArea")
            .field("entries", &self.entries)
            .finish()
    }
}

/// Default provider: previews are private copies in a temporary directory.
///
/// The directory and anything left in it are removed when the store drops.
pub struct TempPreviewStore {
    dir: TempDir,
}

impl TempPreviewStore {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("talent-bridge-previews")
            .tempdir()?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

impl PreviewProvider for TempPreviewStore {
    fn create(&self, file: &StagedFile) -> String {
        let target = self
            .dir
            .path()
            .join(format!("{}-{}", uuid::Uuid::new_v4(), file.file_name));
        match fs::copy(&file.path, &target) {
            Ok(_) => format!("file://{}", target.display()),
            Err(e) => {
                tracing::warn!(
                    file = %file.path.display(),
                    error = %e,
                    "Failed to copy preview, pointing at the original file"
                );
                format!("file://{}", file.path.display())
            }
        }
    }

    fn revoke(&self, url: &str) {
        let Some(path) = url.strip_prefix("file://").map(Path::new) else {
            return;
        };
        // Fallback previews point at the user's file; leave those alone.
        if !path.starts_with(self.dir.path()) {
            return;
        }
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove preview copy");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::RecordingPreviews;

    fn file(name: &str) -> StagedFile {
        StagedFile {
            path: PathBuf::from(format!("/uploads/{name}")),
            file_name: name.to_string(),
            mime_type: mime_for(name).to_string(),
            size: 10,
        }
    }

    #[test]
    fn test_add_then_remove_revokes_once() {
        let previews = Arc::new(RecordingPreviews::default());
        let mut area = MediaStagingArea::new(previews.clone());

        area.add([file("a.png"), file("b.jpg")]);
        let url_a = area.entries()[0].preview_url().to_string();
        let url_b = area.entries()[1].preview_url().to_string();

        let removed = area.remove(0).unwrap();
        assert_eq!(removed.file_name, "a.png");
        assert_eq!(area.len(), 1);
        assert_eq!(area.entries()[0].file.file_name, "b.jpg");
        assert_eq!(previews.revoked(), vec![url_a]);
        assert_eq!(previews.revoke_count(&url_b), 0);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let previews = Arc::new(RecordingPreviews::default());
        let mut area = MediaStagingArea::new(previews.clone());
        area.add([file("a.png")]);

        assert!(area.remove(5).is_none());
        assert_eq!(area.len(), 1);
        assert!(previews.revoked().is_empty());
    }

    #[test]
    fn test_dispose_and_drop_release_everything_once() {
        let previews = Arc::new(RecordingPreviews::default());
        {
            let mut area = MediaStagingArea::new(previews.clone());
            area.add([file("a.png"), file("b.png")]);
            area.dispose_all();
            assert!(area.is_empty());
            area.add([file("c.png")]);
        }
        let created = previews.created();
        assert_eq!(created.len(), 3);
        for url in &created {
            assert_eq!(previews.revoke_count(url), 1, "{url}");
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let previews = Arc::new(RecordingPreviews::default());
        let mut area = MediaStagingArea::new(previews);
        area.add([file("1.png"), file("2.png")]);
        area.add([file("3.png")]);
        let names: Vec<_> = area.files().into_iter().map(|f| f.file_name).collect();
        assert_eq!(names, ["1.png", "2.png", "3.png"]);
    }

    #[test]
    fn test_temp_store_copies_and_deletes() {
        let source_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("logo.png");
        fs::write(&source, b"png-bytes").unwrap();

        let store = Arc::new(TempPreviewStore::new().unwrap());
        let mut area = MediaStagingArea::new(store.clone());
        area.add([StagedFile::from_path(&source).unwrap()]);

        let url = area.entries()[0].preview_url().to_string();
        let copy = PathBuf::from(url.strip_prefix("file://").unwrap());
        assert!(copy.starts_with(store.dir()));
        assert!(copy.exists());

        area.remove(0);
        assert!(!copy.exists());
        assert!(source.exists());
    }

    #[test]
    fn test_from_path_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StagedFile::from_path(dir.path()).is_err());
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(mime_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_for("clip.mp4"), "video/mp4");
        assert_eq!(mime_for("archive.tar"), "application/octet-stream");
    }
}
