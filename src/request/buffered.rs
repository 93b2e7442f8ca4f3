//! Buffered request source
//!
//! Reads a hyper request body into memory and decodes it once, so that
//! normalization and service calls stay synchronous.

use std::collections::HashMap;
use std::convert::Infallible;

use futures_util::stream;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::{Request, StatusCode};
use thiserror::Error;

use super::content_type::{classify, guess_content_type, BodyKind};
use super::normalize::strip_bom;
use super::{FileDescriptor, RequestSource};

/// Failure to buffer a request body
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] multer::Error),
}

impl RequestError {
    /// HTTP status reported to the client
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Body(_) | Self::Multipart(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Fully-read request, decoded into query pairs, form pairs and files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedRequest {
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    body: Bytes,
    files: HashMap<String, FileDescriptor>,
}

impl BufferedRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and decode a hyper request
    ///
    /// The body is collected up to `max_body_size` bytes. Urlencoded bodies,
    /// and untyped bodies that are not JSON, become form pairs; multipart bodies are split into form pairs (text
    /// fields) and files (fields carrying a file name). The raw body is kept
    /// in every case.
    pub async fn from_request<B>(req: Request<B>, max_body_size: usize) -> Result<Self, RequestError>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());

        let body = Limited::new(body, max_body_size)
            .collect()
            .await
            .map_err(|e| {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    RequestError::BodyTooLarge {
                        limit: max_body_size,
                    }
                } else {
                    RequestError::Body(e.to_string())
                }
            })?
            .to_bytes();

        let mut request = Self {
            query: parts.uri.query().map(decode_pairs).unwrap_or_default(),
            body,
            ..Self::default()
        };

        match classify(content_type) {
            BodyKind::UrlEncoded => {
                request.form = serde_urlencoded::from_bytes(&request.body).unwrap_or_default();
            }
            BodyKind::Multipart => {
                let boundary = multer::parse_boundary(content_type.unwrap_or_default())?;
                request.read_multipart(boundary).await?;
            }
            BodyKind::Other if content_type.is_none() && !is_json(&request.body) => {
                request.form = serde_urlencoded::from_bytes(&request.body).unwrap_or_default();
            }
            BodyKind::Other => {}
        }

        Ok(request)
    }

    async fn read_multipart(&mut self, boundary: String) -> Result<(), multer::Error> {
        let body = self.body.clone();
        let mut multipart = multer::Multipart::new(
            stream::once(async move { Ok::<_, Infallible>(body) }),
            boundary,
        );

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(ToString::to_string) {
                let declared = field.content_type().map(ToString::to_string);
                let data = field.bytes().await?;
                let file = FileDescriptor::new(name.clone(), data).with_file_name(file_name);
                let content_type = declared.unwrap_or_else(|| {
                    guess_content_type(file.extension().as_deref()).to_string()
                });
                self.files.insert(name, file.with_content_type(content_type));
            } else {
                let value = field.text().await?;
                self.form.push((name, value));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn with_form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.form
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: FileDescriptor) -> Self {
        self.files.insert(file.field_name().to_string(), file);
        self
    }
}

impl RequestSource for BufferedRequest {
    fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    fn form_pairs(&self) -> &[(String, String)] {
        &self.form
    }

    fn raw_body(&self) -> &[u8] {
        &self.body
    }

    fn file(&self, field_name: &str) -> Option<&FileDescriptor> {
        self.files.get(field_name)
    }
}

/// Bodies sent without a Content-Type are read as JSON when they parse as it
fn is_json(body: &[u8]) -> bool {
    serde_json::from_slice::<serde::de::IgnoredAny>(strip_bom(body)).is_ok()
}

fn decode_pairs(query: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str(query).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::collect;
    use http_body_util::Full;
    use serde_json::json;

    fn build(uri: &str, content_type: Option<&str>, body: &'static str) -> Request<Full<Bytes>> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Full::new(Bytes::from(body))).unwrap()
    }

    #[tokio::test]
    async fn test_query_and_urlencoded_form() {
        let req = build(
            "/products?page=2&sort=name%20asc",
            Some("application/x-www-form-urlencoded"),
            "name=Desk+Lamp&price=19.5",
        );
        let request = BufferedRequest::from_request(req, 1024).await.unwrap();

        assert_eq!(
            request.query_pairs(),
            &[
                ("page".to_string(), "2".to_string()),
                ("sort".to_string(), "name asc".to_string())
            ]
        );
        let data = collect(&request, None);
        assert_eq!(data.get("name"), Some(&json!("Desk Lamp")));
        assert_eq!(data.get("price"), Some(&json!("19.5")));
        assert_eq!(data.get("page"), Some(&json!("2")));
    }

    #[tokio::test]
    async fn test_json_body_kept_raw() {
        let req = build(
            "/products",
            Some("application/json"),
            r#"{"name":"Test Product","price":99.99}"#,
        );
        let request = BufferedRequest::from_request(req, 1024).await.unwrap();

        assert!(request.form_pairs().is_empty());
        let data = collect(&request, None);
        assert_eq!(data.get("name"), Some(&json!("Test Product")));
        assert_eq!(data.get("price"), Some(&json!(99.99)));
    }

    #[tokio::test]
    async fn test_untyped_body() {
        let req = build("/products/7", None, "name=Lamp&price=12");
        let request = BufferedRequest::from_request(req, 1024).await.unwrap();
        let data = collect(&request, None);
        assert_eq!(data.get("name"), Some(&json!("Lamp")));
        assert_eq!(data.get("price"), Some(&json!("12")));

        let req = build("/products/7", None, r#"{"name":"Lamp"}"#);
        let request = BufferedRequest::from_request(req, 1024).await.unwrap();
        assert!(request.form_pairs().is_empty());
        assert_eq!(collect(&request, None).get("name"), Some(&json!("Lamp")));

        let req = build("/products/7", Some("text/plain"), "name=Lamp");
        let request = BufferedRequest::from_request(req, 1024).await.unwrap();
        assert!(request.form_pairs().is_empty());
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let req = build("/products", Some("application/json"), r#"{"name":"too long"}"#);
        let err = BufferedRequest::from_request(req, 4).await.unwrap_err();

        assert!(matches!(err, RequestError::BodyTooLarge { limit: 4 }));
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_multipart_fields_and_files() {
        let body = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"title\"\r\n\r\n\
            Holiday\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"photo\"; filename=\"beach.png\"\r\n\r\n\
            PNGDATA\r\n\
            --XYZ--\r\n";
        let req = build("/albums", Some("multipart/form-data; boundary=XYZ"), body);
        let request = BufferedRequest::from_request(req, 4096).await.unwrap();

        let data = collect(&request, None);
        assert_eq!(data.get("title"), Some(&json!("Holiday")));
        assert!(!data.contains_key("photo"));

        let photo = request.file("photo").unwrap();
        assert_eq!(photo.file_name(), Some("beach.png"));
        assert_eq!(photo.content_type(), Some("image/png"));
        assert_eq!(photo.bytes(), Bytes::from_static(b"PNGDATA"));
    }

    #[tokio::test]
    async fn test_multipart_without_boundary() {
        let req = build("/albums", Some("multipart/form-data"), "junk");
        let err = BufferedRequest::from_request(req, 4096).await.unwrap_err();

        assert!(matches!(err, RequestError::Multipart(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
