//! Naming rules for collection and document ids

/// Maximum byte length of a collection or document id
pub const MAX_ID_BYTES: usize = 1500;

/// Why `id` cannot name a collection or document, if it cannot
///
/// `kind` names the id in the message ("collection", "uid", ...).
#[must_use]
pub fn id_violation(kind: &str, id: &str) -> Option<String> {
    if id.is_empty() {
        return Some(format!("{kind} cannot be empty"));
    }
    if id.len() > MAX_ID_BYTES {
        return Some(format!("{kind} exceeds {MAX_ID_BYTES} bytes"));
    }
    if id.contains('/') {
        return Some(format!("{kind} '{id}' must not contain '/'"));
    }
    if id == "." || id == ".." {
        return Some(format!("{kind} '{id}' is reserved"));
    }
    if id.len() >= 4 && id.starts_with("__") && id.ends_with("__") {
        return Some(format!("{kind} '{id}' matches the reserved __.*__ pattern"));
    }
    None
}
