//! Uploaded file descriptors

use hyper::body::Bytes;
use std::path::Path;

/// One uploaded file, keyed by the form field it arrived in
///
/// The file content is held in memory; storing it anywhere is left to the
/// service that receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    field_name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl FileDescriptor {
    pub fn new(field_name: impl Into<String>, data: Bytes) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: None,
            content_type: None,
            data,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// File name as sent by the client
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Lowercased extension of the client file name
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Handle to the file content
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }
}
