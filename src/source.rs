use crate::error::LoadError;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Where the bytes of one load come from.
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    /// An already-open stream, such as a file handle or a network body.
    Reader {
        name: String,
        reader: Box<dyn AsyncRead + Send + Unpin>,
    },
}

impl DocumentSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DocumentSource::Path(path.into())
    }

    pub fn reader(name: impl Into<String>, reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        DocumentSource::Reader {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// A short name for logs and exported file names.
    pub fn name(&self) -> String {
        match self {
            DocumentSource::Path(p) => p
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            DocumentSource::Bytes(b) => format!("<{} bytes>", b.len()),
            DocumentSource::Reader { name, .. } => name.clone(),
        }
    }

    /// Reads the whole source. Path and reader sources suspend on tokio I/O.
    pub async fn read(self) -> Result<Vec<u8>, LoadError> {
        let bytes = match self {
            DocumentSource::Path(path) => read_path(&path).await?,
            DocumentSource::Bytes(bytes) => bytes,
            DocumentSource::Reader { name, mut reader } => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes).await.map_err(|e| {
                    LoadError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to read document from '{}': {}", name, e),
                    ))
                })?;
                bytes
            }
        };
        if bytes.is_empty() {
            return Err(LoadError::EmptySource);
        }
        Ok(bytes)
    }
}

async fn read_path(path: &Path) -> Result<Vec<u8>, LoadError> {
    tokio::fs::read(path).await.map_err(|e| {
        LoadError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read document from '{}': {}", path.display(), e),
        ))
    })
}

impl fmt::Debug for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            DocumentSource::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            DocumentSource::Reader { name, .. } => {
                f.debug_struct("Reader").field("name", name).finish_non_exhaustive()
            }
        }
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        DocumentSource::Path(path)
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentSource::Bytes(bytes)
    }
}

impl From<tokio::fs::File> for DocumentSource {
    fn from(file: tokio::fs::File) -> Self {
        DocumentSource::reader("<open file>", file)
    }
}
