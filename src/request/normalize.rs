// Input merging
// Query < form < JSON body < route parameters

use serde_json::Value;

use super::{FileDescriptor, Inputs, RequestSource};

/// Merge every request input source into one mapping
///
/// Sources are applied in increasing priority, so on key collision the later
/// source wins:
/// 1. Query parameters
/// 2. Form body
/// 3. JSON body
/// 4. Route parameters
///
/// The request is only read, never modified.
pub fn collect<R>(request: &R, route_params: Option<&Inputs>) -> Inputs
where
    R: RequestSource + ?Sized,
{
    let mut data = pairs_to_inputs(request.query_pairs());
    data.extend(pairs_to_inputs(request.form_pairs()));
    data.extend(parse_json_body(request.raw_body()));

    if let Some(params) = route_params {
        data.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    data
}

/// Look up one uploaded file by form field name
pub fn file_input<'a, R>(request: &'a R, field_name: &str) -> Option<&'a FileDescriptor>
where
    R: RequestSource + ?Sized,
{
    request.file(field_name)
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(super) fn strip_bom(raw: &[u8]) -> &[u8] {
    raw.strip_prefix(UTF8_BOM).unwrap_or(raw)
}

/// Parse a raw body as a JSON object
///
/// A leading UTF-8 byte order mark is skipped. Empty bodies, malformed JSON
/// and JSON values that are not objects all yield an empty mapping.
pub fn parse_json_body(raw: &[u8]) -> Inputs {
    let raw = strip_bom(raw);
    if raw.trim_ascii().is_empty() {
        return Inputs::new();
    }

    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => Inputs::new(),
    }
}

/// Convert decoded key/value pairs into string-valued inputs
///
/// A repeated key keeps its last value.
pub fn pairs_to_inputs(pairs: &[(String, String)]) -> Inputs {
    pairs
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::BufferedRequest;
    use hyper::body::Bytes;
    use serde_json::json;

    fn params(value: Value) -> Inputs {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_empty_request() {
        let request = BufferedRequest::new();
        assert!(collect(&request, None).is_empty());
        assert!(collect(&request, Some(&Inputs::new())).is_empty());
    }

    #[test]
    fn test_route_params_win() {
        let request = BufferedRequest::new()
            .with_query([("id", "from-query"), ("page", "2")])
            .with_form([("id", "from-form"), ("name", "Widget")])
            .with_body(r#"{"id":"from-json","price":5}"#);

        let route = params(json!({"id": "42"}));
        let data = collect(&request, Some(&route));

        assert_eq!(data.get("id"), Some(&json!("42")));
        assert_eq!(data.get("page"), Some(&json!("2")));
        assert_eq!(data.get("name"), Some(&json!("Widget")));
        assert_eq!(data.get("price"), Some(&json!(5)));
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_source_priority() {
        let request = BufferedRequest::new()
            .with_query([("a", "query"), ("b", "query"), ("c", "query")])
            .with_form([("b", "form"), ("c", "form")])
            .with_body(r#"{"c":"json"}"#);

        let data = collect(&request, None);
        assert_eq!(data.get("a"), Some(&json!("query")));
        assert_eq!(data.get("b"), Some(&json!("form")));
        assert_eq!(data.get("c"), Some(&json!("json")));
    }

    #[test]
    fn test_collect_does_not_mutate_request() {
        let request = BufferedRequest::new()
            .with_query([("a", "1")])
            .with_body(r#"{"b":2}"#);
        let before = request.clone();

        let route = params(json!({"a": "override"}));
        let _ = collect(&request, Some(&route));
        assert_eq!(request, before);
    }

    #[test]
    fn test_parse_valid_json() {
        let data = parse_json_body(br#"{"name":"Test Product","price":99.99}"#);
        assert_eq!(data.get("name"), Some(&json!("Test Product")));
        assert_eq!(data.get("price").and_then(Value::as_f64), Some(99.99));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_json_body(b"invalid json{").is_empty());
        assert!(parse_json_body(b"").is_empty());
        assert!(parse_json_body(b"  \r\n ").is_empty());
    }

    #[test]
    fn test_parse_json_with_bom() {
        let data = parse_json_body(b"\xEF\xBB\xBF{\"a\":1}");
        assert_eq!(data.get("a"), Some(&json!(1)));
        assert!(parse_json_body(b"\xEF\xBB\xBF").is_empty());
    }

    #[test]
    fn test_parse_non_object_json() {
        assert!(parse_json_body(b"[1,2,3]").is_empty());
        assert!(parse_json_body(b"\"text\"").is_empty());
        assert!(parse_json_body(b"null").is_empty());
    }

    #[test]
    fn test_repeated_pair_keeps_last() {
        let pairs = vec![
            ("tag".to_string(), "first".to_string()),
            ("tag".to_string(), "second".to_string()),
        ];
        let data = pairs_to_inputs(&pairs);
        assert_eq!(data.get("tag"), Some(&json!("second")));
    }

    #[test]
    fn test_file_input() {
        let file = FileDescriptor::new("avatar", Bytes::from_static(b"\x89PNG"))
            .with_file_name("me.png");
        let request = BufferedRequest::new().with_file(file.clone());

        assert_eq!(file_input(&request, "avatar"), Some(&file));
        assert_eq!(file_input(&request, "missing"), None);
        // Files never leak into the merged inputs
        assert!(collect(&request, None).is_empty());
    }
}
