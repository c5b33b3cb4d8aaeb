use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::validation::signatures::mime_for_extension;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileType {
    Image(ImageType),
    Document(DocumentType),
    Executable(String),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImageType {
    Jpeg,
    Png,
    Webp,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Other(String),
}

pub struct FileTypeDetector;

impl FileTypeDetector {
    pub fn detect(data: &[u8]) -> FileType {
        let Some(kind) = infer::get(data) else {
            return FileType::Unknown;
        };

        if kind.matcher_type() == infer::MatcherType::App {
            return FileType::Executable(kind.mime_type().to_string());
        }

        match kind.mime_type() {
            "image/jpeg" => FileType::Image(ImageType::Jpeg),
            "image/png" => FileType::Image(ImageType::Png),
            "image/webp" => FileType::Image(ImageType::Webp),
            "application/pdf" => FileType::Document(DocumentType::Pdf),

            mime if mime.starts_with("image/") => FileType::Image(ImageType::Other(mime.to_string())),
            mime if mime.starts_with("application/") => {
                FileType::Document(DocumentType::Other(mime.to_string()))
            }
            _ => FileType::Unknown,
        }
    }
}

/// Where the bytes of a candidate live.
#[derive(Debug, Clone)]
pub enum FileContent {
    Memory(Vec<u8>),
    Disk(PathBuf),
}

/// A file offered for upload: its name, declared type, size and content.
///
/// The validator only borrows a candidate for the duration of one call.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub declared_mime_type: String,
    pub size: u64,
    content: FileContent,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, declared_mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_mime_type: declared_mime_type.into(),
            size: bytes.len() as u64,
            content: FileContent::Memory(bytes),
        }
    }

    /// Opens a file on disk. The declared type falls back to the one implied by
    /// the extension, then to `application/octet-stream`.
    pub async fn from_path<P: AsRef<Path>>(path: P, declared_mime_type: Option<&str>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let metadata = fs::metadata(&path).await?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let declared_mime_type = match declared_mime_type {
            Some(mime) => mime.to_string(),
            None => name
                .rsplit_once('.')
                .and_then(|(_, ext)| mime_for_extension(ext))
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        Ok(Self {
            name,
            declared_mime_type,
            size: metadata.len(),
            content: FileContent::Disk(path),
        })
    }

    /// Overrides the reported size, as a browser `File.size` would.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }

    pub async fn read_head(&self, len: usize) -> std::io::Result<Vec<u8>> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(bytes[..bytes.len().min(len)].to_vec()),
            FileContent::Disk(path) => {
                let file = fs::File::open(path).await?;
                let mut head = Vec::with_capacity(len);
                file.take(len as u64).read_to_end(&mut head).await?;
                Ok(head)
            }
        }
    }

    pub async fn read_all(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            FileContent::Disk(path) => Ok(Cow::Owned(fs::read(path).await?)),
        }
    }
}
