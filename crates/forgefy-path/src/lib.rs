//! Dotted-path lookup over JSON values.
//!
//! A path selects a value inside a [`serde_json::Value`] tree. Paths are
//! dot-separated key segments with an optional leading `$`, e.g.
//! `$user.address.city` or `items.0.name`. Numeric segments index into
//! arrays. A path that does not lead to a value resolves to `None` — a miss
//! is never an error.
//!
//! # Example
//!
//! ```
//! use forgefy_path::{parse_path, get, resolve};
//!
//! let doc = serde_json::json!({"user": {"tags": ["a", "b"]}});
//!
//! // Parse a path into segments ("$" is optional sugar)
//! let path = parse_path("$user.tags.1");
//! assert_eq!(path, vec!["user", "tags", "1"]);
//!
//! // Walk the document by segments
//! assert_eq!(get(&doc, &path), Some(&serde_json::json!("b")));
//!
//! // Or do both in one step
//! assert_eq!(resolve(&doc, "user.tags.0"), Some(&serde_json::json!("a")));
//! assert_eq!(resolve(&doc, "$user.missing"), None);
//! ```

use serde_json::Value;

/// Returns true when a string is syntactically a path reference.
///
/// Only the shape is checked: a path reference starts with `$`. Whether the
/// path actually leads anywhere is a separate question answered by
/// [`resolve`].
///
/// # Example
///
/// ```
/// use forgefy_path::is_path_ref;
///
/// assert!(is_path_ref("$user.name"));
/// assert!(is_path_ref("$items.0"));
/// assert!(!is_path_ref("user.name"));
/// assert!(!is_path_ref(""));
/// ```
pub fn is_path_ref(s: &str) -> bool {
    s.starts_with('$')
}

/// Parses a dotted path into key segments.
///
/// A leading `$` is optional sugar and is stripped before splitting on `.`.
/// Segments are borrowed from the input; no unescaping exists in this
/// grammar. An empty path (or a bare `$`) yields a single empty segment,
/// which never matches a real key.
///
/// # Example
///
/// ```
/// use forgefy_path::parse_path;
///
/// assert_eq!(parse_path("$a.b.c"), vec!["a", "b", "c"]);
/// assert_eq!(parse_path("a.b"), vec!["a", "b"]);
/// assert_eq!(parse_path("$items.0.name"), vec!["items", "0", "name"]);
/// assert_eq!(parse_path("$"), vec![""]);
/// ```
pub fn parse_path(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('$').unwrap_or(path);
    path.split('.').collect()
}

/// Checks that a string is a canonical array index.
///
/// Canonical means ASCII digits only, with no leading zeros (`"01"` is not
/// an index, mirroring JS `arr["01"]` being a miss).
///
/// # Example
///
/// ```
/// use forgefy_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("12"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Walks a JSON value by path segments.
///
/// Objects are descended by key, arrays by canonical numeric index. Any
/// mismatch — absent key, bad index, scalar in the middle of the path —
/// returns `None`. An empty segment list returns the value itself.
///
/// # Example
///
/// ```
/// use forgefy_path::get;
///
/// let doc = serde_json::json!({"a": [{"b": 1}]});
/// assert_eq!(get(&doc, &["a", "0", "b"]), Some(&serde_json::json!(1)));
/// assert_eq!(get(&doc, &["a", "1", "b"]), None);
/// assert_eq!(get(&doc, &[]), Some(&doc));
/// ```
pub fn get<'a>(source: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = source;
    for segment in path {
        match current {
            Value::Object(map) => {
                current = map.get(*segment)?;
            }
            Value::Array(arr) => {
                if !is_valid_index(segment) {
                    return None;
                }
                let idx: usize = segment.parse().ok()?;
                current = arr.get(idx)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Resolves a dotted path string against a JSON value.
///
/// Equivalent to [`parse_path`] followed by [`get`]. The `$` prefix is
/// optional. Resolution is deterministic and side-effect free; a miss is
/// `None`, never an error.
///
/// # Example
///
/// ```
/// use forgefy_path::resolve;
///
/// let doc = serde_json::json!({"order": {"lines": [{"sku": "X1"}]}});
/// assert_eq!(
///     resolve(&doc, "$order.lines.0.sku"),
///     Some(&serde_json::json!("X1"))
/// );
/// assert_eq!(resolve(&doc, "$order.lines.9.sku"), None);
/// assert_eq!(resolve(&doc, "order.total"), None);
/// ```
pub fn resolve<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    get(source, &parse_path(path))
}
