//! Shared PDF object helpers used across the walker and classifier.

use lopdf::{Dictionary, Document, Object};

/// Upper bound on chained indirect references followed by [`resolve`].
const MAX_REFERENCE_HOPS: usize = 32;

/// Follow indirect references until a direct object is reached.
///
/// Returns `None` for dangling references or reference chains longer than
/// [`MAX_REFERENCE_HOPS`].
pub fn resolve<'a>(document: &'a Document, value: &'a Object) -> Option<&'a Object> {
    let mut current = value;
    for _ in 0..MAX_REFERENCE_HOPS {
        match current.as_reference() {
            Ok(id) => current = document.get_object(id).ok()?,
            Err(_) => return Some(current),
        }
    }
    None
}

/// Resolve a value that might be inline or a reference to a dictionary.
pub fn resolve_dict<'a>(document: &'a Document, value: &'a Object) -> Option<&'a Dictionary> {
    resolve(document, value).and_then(|o| o.as_dict().ok())
}

/// Look up `key` in `dict` and resolve it to a direct object.
pub fn get_resolved<'a>(
    document: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|v| resolve(document, v))
}

/// Read a name entry (e.g. `/Subtype /Image`) as a UTF-8 string.
pub fn name_from_dict(document: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    get_resolved(document, dict, key)
        .and_then(|v| v.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

/// Read a non-negative integer entry, tolerating real numbers such as `300.0`.
pub fn u32_from_dict(document: &Document, dict: &Dictionary, key: &[u8]) -> Option<u32> {
    let value = get_resolved(document, dict, key)?;
    let n = match value.as_i64() {
        Ok(i) => i,
        Err(_) => value.as_float().ok()? as i64,
    };
    u32::try_from(n).ok()
}
