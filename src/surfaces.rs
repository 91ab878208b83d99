use docview_traits::{DownloadSurface, PrintSurface, ShareSurface, SurfaceError};
use std::path::{Path, PathBuf};

/// Writes every delivered artifact into one directory.
///
/// Print jobs land as `<job>.print.pdf`, shares as `<name>` under `shared/`.
#[derive(Debug, Clone)]
pub struct DirectorySurface {
    root: PathBuf,
}

impl DirectorySurface {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write(&self, dir: &Path, file_name: &str, artifact: &[u8]) -> Result<PathBuf, SurfaceError> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| SurfaceError::Unavailable(format!("invalid file name '{}'", file_name)))?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(name);
        std::fs::write(&path, artifact)?;
        log::info!("Wrote {} bytes to {}", artifact.len(), path.display());
        Ok(path)
    }
}

impl PrintSurface for DirectorySurface {
    fn print(&self, job_name: &str, artifact: &[u8]) -> Result<(), SurfaceError> {
        self.write(&self.root, &format!("{}.print.pdf", job_name), artifact)
            .map(|_| ())
    }
}

impl DownloadSurface for DirectorySurface {
    fn save(&self, file_name: &str, artifact: &[u8]) -> Result<String, SurfaceError> {
        let path = self.write(&self.root, file_name, artifact)?;
        Ok(path.display().to_string())
    }
}

impl ShareSurface for DirectorySurface {
    fn share(&self, file_name: &str, artifact: &[u8]) -> Result<(), SurfaceError> {
        self.write(&self.root.join("shared"), file_name, artifact)
            .map(|_| ())
    }
}

/// Default surface when the host supplies none; every delivery fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSurface;

impl PrintSurface for NoSurface {
    fn print(&self, _job_name: &str, _artifact: &[u8]) -> Result<(), SurfaceError> {
        Err(SurfaceError::Unavailable("no print surface configured".to_string()))
    }
}

impl DownloadSurface for NoSurface {
    fn save(&self, _file_name: &str, _artifact: &[u8]) -> Result<String, SurfaceError> {
        Err(SurfaceError::Unavailable("no download surface configured".to_string()))
    }
}

impl ShareSurface for NoSurface {
    fn share(&self, _file_name: &str, _artifact: &[u8]) -> Result<(), SurfaceError> {
        Err(SurfaceError::Unavailable("no share surface configured".to_string()))
    }
}
