/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// First `len` hex chars of the SHA-256 of `input`.
///
/// Used to derive stable fallback item codes from display names: identical
/// names always produce the same suffix, so repeated orders for the same
/// unnamed product converge on one item record.
pub fn short_hash(input: &str, len: usize) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(input.as_bytes());
    let mut out = format!("{digest:x}");
    out.truncate(len);
    out
}

/// Lowercase a display name into a code-safe slug: alphanumerics kept,
/// everything else collapsed to single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
