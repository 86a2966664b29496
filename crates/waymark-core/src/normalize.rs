//! Canonical URL-safe spelling of node names and paths.

use std::sync::OnceLock;

use regex::Regex;

use crate::decode::NameDecoder;

/// Normalize a raw name or path into its friendly spelling.
///
/// - Entity and store-name escaping is decoded first
/// - ASCII letters and digits are kept (lower-cased), as are `/` and `-`
/// - Every other character becomes `-`
/// - Runs of `-` and runs of `/` collapse to a single delimiter
///
/// The output only contains `[a-z0-9/-]` and normalizing it again yields the
/// same string.
///
/// # Examples
///
/// ```
/// use waymark_core::decode::StandardDecoder;
/// use waymark_core::normalize;
///
/// let decoder = StandardDecoder::default();
/// assert_eq!(normalize("Widgets & Gadgets!", &decoder), "widgets-gadgets-");
/// assert_eq!(normalize("Widgets &amp; Gadgets", &decoder), "widgets-gadgets");
/// assert_eq!(normalize("foo-bar", &decoder), "foo-bar");
/// assert_eq!(normalize("//Home//Red Widget", &decoder), "/home/red-widget");
/// ```
pub fn normalize(raw: &str, decoder: &dyn NameDecoder) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let decoded = decoder.decode_entities(raw);
    let decoded = decoder.decode_store_name(&decoded);

    let replaced: String = decoded
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '/' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    let collapsed = collapse_runs(replaced, '-');
    collapse_runs(collapsed, '/')
}

/// Replace doubled delimiters until none are left
fn collapse_runs(mut input: String, delimiter: char) -> String {
    let doubled: String = [delimiter, delimiter].iter().collect();
    let single = delimiter.to_string();

    let mut changed = true;
    while changed {
        let next = input.replace(&doubled, &single);
        changed = next.len() != input.len();
        input = next;
    }

    input
}

/// Strip a leading `http://host` or `https://host` from a URL, leaving the
/// path, query and fragment.
///
/// ```
/// use waymark_core::to_relative_url;
///
/// assert_eq!(to_relative_url("https://example.com/products/?a=1"), "/products/?a=1");
/// assert_eq!(to_relative_url("/products/"), "/products/");
/// ```
pub fn to_relative_url(url: &str) -> String {
    static SERVER: OnceLock<Regex> = OnceLock::new();
    let server = SERVER.get_or_init(|| Regex::new(r"^https?://[^/]+").expect("valid regex"));

    server.replace(url, "").into_owned()
}
