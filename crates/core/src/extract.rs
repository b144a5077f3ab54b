//! Normalisation of heterogeneous task-result payloads into image URLs.
//!
//! Backends report finished images in many shapes: a bare string, a list
//! of strings, a list of objects carrying the URL under one of several
//! field names, or a single such object, optionally nested under
//! `output`, `images` or `data`. [`extract_urls`] is total over all of
//! them; anything unrecognised yields an empty list.

use serde_json::{Map, Value};

/// Container keys probed, in order, before falling back to the payload.
const CONTAINER_KEYS: &[&str] = &["output", "images", "data"];

/// Object fields that may carry an image URL, in priority order.
const URL_FIELDS: &[&str] = &["imageUrl", "url", "uri", "image", "src"];

/// The accepted shapes of a result container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// A single URL.
    Url(&'a str),
    /// A list of URLs and/or URL-carrying objects.
    List(&'a [Value]),
    /// One URL-carrying object.
    Record(&'a Map<String, Value>),
    /// Null, empty, or a scalar that carries no URL.
    Empty,
}

/// Classify a container value.
///
/// Empty strings, `false` and `0` count as empty, matching the loose
/// truthiness the payloads were designed around.
pub fn classify(value: &Value) -> PayloadShape<'_> {
    match value {
        Value::String(s) if !s.is_empty() => PayloadShape::Url(s),
        Value::Array(items) => PayloadShape::List(items),
        Value::Object(map) => PayloadShape::Record(map),
        _ => PayloadShape::Empty,
    }
}

/// Pick the container: first non-null of `output`, `images`, `data`,
/// otherwise the payload itself.
fn container(payload: &Value) -> &Value {
    if let Value::Object(map) = payload {
        for key in CONTAINER_KEYS {
            match map.get(*key) {
                Some(Value::Null) | None => continue,
                Some(found) => return found,
            }
        }
    }
    payload
}

/// URL of an object: the first non-null field among [`URL_FIELDS`], kept
/// only when it is a non-empty string.
fn record_url(map: &Map<String, Value>) -> Option<&str> {
    let candidate = URL_FIELDS
        .iter()
        .find_map(|field| map.get(*field).filter(|v| !v.is_null()))?;
    candidate.as_str().filter(|s| !s.is_empty())
}

/// Extract every image URL from a result payload.
pub fn extract_urls(payload: &Value) -> Vec<String> {
    match classify(container(payload)) {
        PayloadShape::Url(url) => vec![url.to_string()],
        PayloadShape::List(items) => items
            .iter()
            .filter_map(|item| match classify(item) {
                PayloadShape::Url(url) => Some(url),
                PayloadShape::Record(map) => record_url(map),
                PayloadShape::List(_) | PayloadShape::Empty => None,
            })
            .map(str::to_string)
            .collect(),
        PayloadShape::Record(map) => record_url(map).map(str::to_string).into_iter().collect(),
        PayloadShape::Empty => Vec::new(),
    }
}

/// Decode a task field that may be an object or a JSON-encoded string.
///
/// Malformed JSON and empty values decode to `None` rather than failing.
pub fn parse_json_field(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => serde_json::from_str(s).ok(),
        Value::Bool(false) => None,
        other => Some(other.clone()),
    }
}

/// Loose truthiness: null, `false`, `0`, and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First truthy field of `value` among `keys`, else `value` itself.
fn first_truthy<'a>(value: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| is_truthy(v))
        .unwrap_or(value)
}

/// Image URLs of a finished task.
///
/// `task_info` is consulted first (`images`, else the whole object);
/// `task_result` (`output`, else `images`, else the whole object) is used
/// only when `task_info` yields nothing. Either may be a JSON string.
pub fn parse_task_images(task_info: Option<&Value>, task_result: Option<&Value>) -> Vec<String> {
    let info_urls = parse_json_field(task_info)
        .map(|info| extract_urls(first_truthy(&info, &["images"])))
        .unwrap_or_default();
    if !info_urls.is_empty() {
        return info_urls;
    }

    parse_json_field(task_result)
        .map(|result| extract_urls(first_truthy(&result, &["output", "images"])))
        .unwrap_or_default()
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
