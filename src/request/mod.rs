//! Request normalization module
//!
//! Collects everything a client sent into a single mapping:
//! - Query string parameters
//! - Form bodies (urlencoded, or the text fields of a multipart body)
//! - A best-effort JSON body
//! - Route parameters captured by the router
//!
//! Uploaded files are kept apart and looked up on demand by field name.

mod buffered;
mod content_type;
mod files;
mod normalize;

pub use buffered::{BufferedRequest, RequestError};
pub use content_type::{classify, guess_content_type, BodyKind};
pub use files::FileDescriptor;
pub use normalize::{collect, file_input, pairs_to_inputs, parse_json_body};

/// Normalized input handed to a service operation
pub type Inputs = serde_json::Map<String, serde_json::Value>;

/// Read-only view over the parts of a request the normalizer consumes
pub trait RequestSource {
    /// Decoded query string pairs, in order of appearance
    fn query_pairs(&self) -> &[(String, String)];

    /// Decoded form body pairs, in order of appearance
    fn form_pairs(&self) -> &[(String, String)];

    /// Raw request body bytes
    fn raw_body(&self) -> &[u8];

    /// Uploaded file for a form field, if any
    fn file(&self, field_name: &str) -> Option<&FileDescriptor>;
}
