//! Scalar-value indexing over `str`.

pub(crate) fn char_len(s: &str) -> usize {
    if s.is_ascii() {
        s.len()
    } else {
        s.chars().count()
    }
}

pub(crate) fn char_at(s: &str, index: usize) -> Option<char> {
    if s.is_ascii() {
        s.as_bytes().get(index).map(|&b| char::from(b))
    } else {
        s.chars().nth(index)
    }
}

/// Substring of scalar values `[lo, hi)`. Callers clamp the bounds.
pub(crate) fn char_slice(s: &str, lo: usize, hi: usize) -> &str {
    if lo >= hi {
        return "";
    }
    if s.is_ascii() {
        return &s[lo.min(s.len())..hi.min(s.len())];
    }
    let mut offsets = s.char_indices().map(|(i, _)| i).chain([s.len()]);
    let start = offsets.nth(lo).unwrap_or(s.len());
    let end = offsets.nth(hi - lo - 1).unwrap_or(s.len());
    &s[start..end]
}
