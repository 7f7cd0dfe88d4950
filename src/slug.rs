use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;

macro_rules! regex {
    ($pattern:expr) => {{
        static REGEX: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).unwrap());
        &REGEX
    }};
}

/// Derives a URL-safe slug from an event title: lowercase, word characters
/// and hyphens only, whitespace runs collapsed into single hyphens.
pub fn derive(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = regex!(r"[^a-z0-9_\s-]").replace_all(&lowered, "");
    let hyphenated = regex!(r"\s+").replace_all(&stripped, "-");
    let collapsed = regex!(r"-+").replace_all(&hyphenated, "-");

    collapsed.trim_matches('-').to_string()
}

/// Normalizes and validates a lookup key. Keys are lowercased and trimmed
/// but never slugified; anything outside the slug alphabet is rejected
/// before the store is touched.
pub fn normalize(raw: &str) -> Result<String, Error> {
    let slug = raw.trim().to_lowercase();

    if slug.is_empty() {
        return Err(Error::MissingParameter);
    }

    if !regex!(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").is_match(&slug) {
        return Err(Error::InvalidFormat(slug));
    }

    Ok(slug)
}
