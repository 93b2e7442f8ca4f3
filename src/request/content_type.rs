//! Content-Type handling
//!
//! Classifies request bodies and guesses the type of uploaded files that
//! arrive without one.

/// How a request body should be decoded into form pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// `application/x-www-form-urlencoded`
    UrlEncoded,
    /// `multipart/form-data`
    Multipart,
    /// Anything else, including JSON (parsed separately from the raw body)
    Other,
}

/// Classify a request by its Content-Type header value
///
/// # Examples
/// ```
/// use restkit::request::{classify, BodyKind};
/// assert_eq!(classify(Some("application/x-www-form-urlencoded")), BodyKind::UrlEncoded);
/// assert_eq!(classify(Some("multipart/form-data; boundary=X")), BodyKind::Multipart);
/// assert_eq!(classify(Some("application/json")), BodyKind::Other);
/// assert_eq!(classify(None), BodyKind::Other);
/// ```
pub fn classify(content_type: Option<&str>) -> BodyKind {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match essence.as_deref() {
        Some("application/x-www-form-urlencoded") => BodyKind::UrlEncoded,
        Some("multipart/form-data") => BodyKind::Multipart,
        _ => BodyKind::Other,
    }
}

/// Guess a MIME type from a file extension
pub fn guess_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("txt" | "md") => "text/plain",
        Some("xml") => "application/xml",
        Some("json") => "application/json",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",

        // Documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",

        _ => "application/octet-stream",
    }
}
