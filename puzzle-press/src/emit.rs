//! Output emitter: hands finished artifacts to a sink.
//!
//! Documents are opened for viewing and never kept. Images are saved one
//! at a time; each save settles before the next page is rasterized.
//! Rasterization runs on the blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use puzzle_renderer::{Artifact, ImageBatch};
use uuid::Uuid;

use crate::error::{PressError, PressResult};

/// Destination for composed output.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Open a finished document for viewing. Returns where it was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written or opened.
    async fn open_document(&self, title: &str, bytes: Vec<u8>) -> PressResult<PathBuf>;

    /// Save one file under `name`. Returns where it was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    async fn save_file(&self, name: &str, bytes: Vec<u8>) -> PressResult<PathBuf>;
}

/// Writes images to an output directory and documents to a temporary file
/// handed to a viewer command.
#[derive(Debug, Clone)]
pub struct FileSystemSink {
    out_dir: PathBuf,
    temp_dir: PathBuf,
    viewer: Option<String>,
}

impl FileSystemSink {
    /// Save images under `out_dir`; documents go to the system temp dir.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            temp_dir: std::env::temp_dir(),
            viewer: None,
        }
    }

    /// Open documents with this command.
    #[must_use]
    pub fn with_viewer(mut self, viewer: Option<String>) -> Self {
        self.viewer = viewer.filter(|v| !v.trim().is_empty());
        self
    }

    /// Write documents under this directory.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    fn launch_viewer(&self, path: &Path) -> PressResult<()> {
        let Some(command) = &self.viewer else {
            tracing::info!("Document ready at {}", path.display());
            return Ok(());
        };
        tokio::process::Command::new(command)
            .arg(path)
            .spawn()
            .map_err(|e| PressError::Viewer {
                command: command.clone(),
                reason: e.to_string(),
            })?;
        tracing::info!("Opened {} with {command}", path.display());
        Ok(())
    }
}

#[async_trait]
impl ArtifactSink for FileSystemSink {
    async fn open_document(&self, title: &str, bytes: Vec<u8>) -> PressResult<PathBuf> {
        tokio::fs::create_dir_all(&self.temp_dir).await?;
        let path = self
            .temp_dir
            .join(format!("{title}-{}.pdf", Uuid::new_v4().simple()));
        tokio::fs::write(&path, bytes).await?;
        self.launch_viewer(&path)?;
        Ok(path)
    }

    async fn save_file(&self, name: &str, bytes: Vec<u8>) -> PressResult<PathBuf> {
        tokio::fs::create_dir_all(&self.out_dir).await?;
        let path = self.out_dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Saved {}", path.display());
        Ok(path)
    }
}

/// User-visible failure reporting.
pub trait Notifier: Send + Sync {
    /// Show an alert.
    fn alert(&self, message: &str);
}

/// Logs alerts and echoes them to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        tracing::error!("{message}");
        eprintln!("puzzle-press: {message}");
    }
}

/// Serializes artifacts into a sink.
pub struct Emitter {
    sink: Arc<dyn ArtifactSink>,
    keep_svg: bool,
}

impl Emitter {
    /// Create an emitter over a sink.
    #[must_use]
    pub fn new(sink: Arc<dyn ArtifactSink>) -> Self {
        Self {
            sink,
            keep_svg: false,
        }
    }

    /// Also save each raster page's SVG next to its PNG.
    #[must_use]
    pub fn keep_svg(mut self, keep: bool) -> Self {
        self.keep_svg = keep;
        self
    }

    /// The sink in use.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn ArtifactSink> {
        &self.sink
    }

    /// Emit an artifact. Returns the written paths in emission order.
    ///
    /// # Errors
    ///
    /// Returns the first rasterization or sink failure; pages after it are
    /// not attempted.
    pub async fn emit(&self, artifact: &Artifact) -> PressResult<Vec<PathBuf>> {
        match artifact {
            Artifact::Document { title, bytes } => {
                let path = self.sink.open_document(title, bytes.clone()).await?;
                tracing::info!("Document '{title}' emitted ({} bytes)", bytes.len());
                Ok(vec![path])
            }
            Artifact::Images(batch) => self.save_images(batch).await,
        }
    }

    async fn save_images(&self, batch: &ImageBatch) -> PressResult<Vec<PathBuf>> {
        let shared = Arc::new(batch.clone());
        let mut paths = Vec::with_capacity(batch.len());
        for (i, page) in batch.pages().iter().enumerate() {
            let name = batch.filename(page);
            if self.keep_svg {
                let svg_name = format!("{}.svg", name.trim_end_matches(".png"));
                self.sink
                    .save_file(&svg_name, page.svg.clone().into_bytes())
                    .await?;
            }
            let job = Arc::clone(&shared);
            let png = tokio::task::spawn_blocking(move || job.render(&job.pages()[i])).await??;
            paths.push(self.sink.save_file(&name, png).await?);
        }
        tracing::info!("Saved {} images for '{}'", paths.len(), batch.base());
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use puzzle_renderer::{fontdb, RasterPage, Section};

    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG";

    fn page(index: usize, svg: &str) -> RasterPage {
        RasterPage {
            section: Section::Puzzle,
            index,
            part: 1,
            svg: svg.to_string(),
        }
    }

    fn square() -> &'static str {
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8" fill="black"/></svg>"#
    }

    #[tokio::test]
    async fn test_images_rasterized_and_saved_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let emitter = Emitter::new(Arc::new(FileSystemSink::new(dir.path()))).keep_svg(true);
        let batch = ImageBatch::new(
            "grid".to_string(),
            vec![page(1, square()), page(2, square())],
            Arc::new(fontdb::Database::new()),
            1.0,
        );

        let paths = emitter.emit(&Artifact::Images(batch)).await.unwrap();

        assert_eq!(
            paths,
            vec![
                dir.path().join("grid_puzzle_1.png"),
                dir.path().join("grid_puzzle_2.png")
            ]
        );
        for path in &paths {
            assert!(std::fs::read(path).unwrap().starts_with(PNG_SIGNATURE));
        }
        assert!(dir.path().join("grid_puzzle_2.svg").exists());
    }

    #[tokio::test]
    async fn test_failed_rasterization_stops_the_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let emitter = Emitter::new(Arc::new(FileSystemSink::new(dir.path())));
        let batch = ImageBatch::new(
            "grid".to_string(),
            vec![page(1, "not svg"), page(2, square())],
            Arc::new(fontdb::Database::new()),
            1.0,
        );

        let err = emitter.emit(&Artifact::Images(batch)).await.unwrap_err();

        assert!(matches!(err, PressError::Render(_)), "{err:?}");
        assert!(!dir.path().join("grid_puzzle_2.png").exists());
    }

    #[tokio::test]
    async fn test_save_file_creates_out_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = FileSystemSink::new(dir.path().join("nested/out"));

        let path = sink.save_file("a_puzzle_1.png", vec![1, 2, 3]).await.unwrap();

        assert_eq!(path, dir.path().join("nested/out/a_puzzle_1.png"));
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_document_written_to_temp_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = FileSystemSink::new(dir.path()).with_temp_dir(dir.path().join("tmp"));

        let path = sink
            .open_document("hangman", b"%PDF-1.3".to_vec())
            .await
            .unwrap();

        assert!(path.starts_with(dir.path().join("tmp")));
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("hangman-") && n.ends_with(".pdf")));
    }

    #[tokio::test]
    async fn test_missing_viewer_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = FileSystemSink::new(dir.path())
            .with_temp_dir(dir.path())
            .with_viewer(Some("definitely-not-a-viewer-binary".to_string()));

        let err = sink.open_document("doc", vec![0]).await.unwrap_err();
        assert!(matches!(err, PressError::Viewer { .. }), "{err:?}");
    }

    #[test]
    fn test_blank_viewer_ignored() {
        let sink = FileSystemSink::new(".").with_viewer(Some("  ".to_string()));
        assert!(sink.viewer.is_none());
    }
}
