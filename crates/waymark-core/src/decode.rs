use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// Decoding applied to raw names before normalization.
pub trait NameDecoder: Send + Sync {
    /// Decode HTML entity escaping (`&amp;`, `&#39;`, ...)
    fn decode_entities(&self, raw: &str) -> String;

    /// Undo the content store's own name escaping
    fn decode_store_name(&self, raw: &str) -> String;
}

/// One `find` -> `replaceWith` pair the content store applies when it encodes
/// node names into URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameReplacement {
    pub find: String,
    pub replace_with: String,
}

impl NameReplacement {
    pub fn new(find: impl Into<String>, replace_with: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace_with: replace_with.into(),
        }
    }
}

/// Default decoder: HTML entities, percent-escapes and the configured
/// name replacements.
#[derive(Debug, Clone, Default)]
pub struct StandardDecoder {
    replacements: Vec<NameReplacement>,
}

impl StandardDecoder {
    pub fn new(replacements: Vec<NameReplacement>) -> Self {
        Self { replacements }
    }

    /// Apply the replacements in declaration order
    pub fn encode_store_name(&self, name: &str) -> String {
        self.replacements
            .iter()
            .filter(|r| !r.find.is_empty())
            .fold(name.to_string(), |acc, r| acc.replace(&r.find, &r.replace_with))
    }
}

impl NameDecoder for StandardDecoder {
    fn decode_entities(&self, raw: &str) -> String {
        decode_html_entities(raw)
    }

    fn decode_store_name(&self, raw: &str) -> String {
        let decoded = percent_decode(raw);
        self.replacements
            .iter()
            .rev()
            .filter(|r| !r.replace_with.is_empty())
            .fold(decoded, |acc, r| acc.replace(&r.replace_with, &r.find))
    }
}

/// Percent-decode `%XX` escapes. Input that does not decode to UTF-8 is
/// returned unchanged.
pub fn percent_decode(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

// Longest entity we try to match, including the `&` and `;`
const MAX_ENTITY_LEN: usize = 12;

/// Decode named and numeric HTML entities. Unknown or malformed entities are
/// kept verbatim.
pub fn decode_html_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .char_indices()
            .take(MAX_ENTITY_LEN)
            .find(|&(_, c)| c == ';')
            .and_then(|(semi, _)| entity_char(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn entity_char(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}
