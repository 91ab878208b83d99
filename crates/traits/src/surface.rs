//! Platform surfaces that receive an exported artifact.

use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Surface unavailable: {0}")]
    Unavailable(String),
}

/// Sends a paginated artifact to a native print surface.
pub trait PrintSurface: Send + Sync {
    fn print(&self, job_name: &str, artifact: &[u8]) -> Result<(), SurfaceError>;
}

/// Persists an artifact; returns where it ended up.
pub trait DownloadSurface: Send + Sync {
    fn save(&self, file_name: &str, artifact: &[u8]) -> Result<String, SurfaceError>;
}

/// Hands an artifact to the platform share surface.
pub trait ShareSurface: Send + Sync {
    fn share(&self, file_name: &str, artifact: &[u8]) -> Result<(), SurfaceError>;
}

/// Which surface received a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Print,
    Download,
    Share,
}

/// Keeps every artifact it receives in memory.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    deliveries: Mutex<Vec<(SurfaceKind, String, Vec<u8>)>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All deliveries as `(surface, name, bytes)`, oldest first.
    pub fn deliveries(&self) -> Vec<(SurfaceKind, String, Vec<u8>)> {
        self.deliveries
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    fn record(&self, kind: SurfaceKind, name: &str, artifact: &[u8]) -> Result<(), SurfaceError> {
        let mut deliveries = self
            .deliveries
            .lock()
            .map_err(|_| SurfaceError::Unavailable("recording lock poisoned".to_string()))?;
        deliveries.push((kind, name.to_string(), artifact.to_vec()));
        Ok(())
    }
}

impl PrintSurface for RecordingSurface {
    fn print(&self, job_name: &str, artifact: &[u8]) -> Result<(), SurfaceError> {
        self.record(SurfaceKind::Print, job_name, artifact)
    }
}

impl DownloadSurface for RecordingSurface {
    fn save(&self, file_name: &str, artifact: &[u8]) -> Result<String, SurfaceError> {
        self.record(SurfaceKind::Download, file_name, artifact)?;
        Ok(format!("memory://{}", file_name))
    }
}

impl ShareSurface for RecordingSurface {
    fn share(&self, file_name: &str, artifact: &[u8]) -> Result<(), SurfaceError> {
        self.record(SurfaceKind::Share, file_name, artifact)
    }
}
