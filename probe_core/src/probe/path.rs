//! Path normalization rules shared by the probe matcher and the settings
//! writer.

/// Strips leading and trailing `/` from a request or mount path.
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Removes the application's mount prefix from an already slash-trimmed
/// request path. The prefix must match a whole segment boundary: `base`
/// itself, or `base` followed by a single `/`. A path that does not start
/// with the base is returned unmodified rather than rejected, so a probe
/// request that bypasses the mount prefix still resolves.
pub fn strip_base_path<'a>(path: &'a str, base: &str) -> &'a str {
    let base = trim_slashes(base);
    if base.is_empty() {
        return path;
    }

    match path.strip_prefix(base) {
        Some("") => "",
        Some(rest) => rest.strip_prefix('/').unwrap_or(path),
        None => path,
    }
}

/// Normalizes operator input into a probe path slug: surrounding whitespace
/// and slashes are dropped, letters are lowercased, whitespace and `/` and
/// `.` runs collapse to a single `-`, anything outside `a-z 0-9 - _` is
/// removed, and leftover dashes at either end are trimmed. Returns an empty
/// string when nothing usable remains; the caller decides the fallback.
pub fn sanitize_probe_path(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.trim().trim_matches('/').chars() {
        match ch.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '_') => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            }
            '-' | ' ' | '\t' | '/' | '.' => {
                pending_dash = true;
            }
            _ => {}
        }
    }

    slug
}
