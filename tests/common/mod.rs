#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use docview::traits::RecordingSurface;
use docview::{DocumentViewer, ViewerConfig};
use lopdf::Document as LopdfDocument;
use serde_json::Value;
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around an exported PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Viewer with in-memory surfaces
pub fn viewer_with(config: ViewerConfig) -> (DocumentViewer, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::new());
    let viewer = DocumentViewer::builder()
        .with_config(config)
        .with_surfaces(surface.clone())
        .build()
        .unwrap_or_else(|e| panic!("invalid test config: {e}"));
    (viewer, surface)
}

pub fn viewer() -> (DocumentViewer, Arc<RecordingSurface>) {
    viewer_with(ViewerConfig::default())
}

/// Load a JSON document into a fresh viewer
pub async fn load(doc: &Value) -> Result<DocumentViewer, Box<dyn std::error::Error>> {
    let (viewer, _) = viewer();
    viewer.load(fixtures::to_bytes(doc)).await?;
    Ok(viewer)
}

/// Load and export a JSON document with the given config
pub async fn export_with(
    doc: &Value,
    config: ViewerConfig,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let (viewer, _) = viewer_with(config);
    viewer.load(fixtures::to_bytes(doc)).await?;
    let artifact = viewer.export().await?;
    GeneratedPdf::from_bytes(artifact.bytes)
}

pub async fn export(doc: &Value) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    export_with(doc, ViewerConfig::default()).await
}
