//! Tolerant parser for structured description strings.
//!
//! Published audio resources carry a free-form description that, by
//! convention, encodes semicolon-separated `key=value` pairs:
//! `title=Hello World;author=John Doe`. Descriptions come from multiple
//! publisher generations, so parsing must survive malformed pairs.

/// Fields recovered from a description string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionFields {
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl DescriptionFields {
    /// Whether nothing usable was recovered.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none()
    }
}

/// Parse `key=value;key=value` pairs out of a description.
///
/// Recognized keys: `title`, and `author`/`artist` (both seen in the
/// wild). Malformed pairs (no `=`, empty key or value) are skipped
/// individually; a value containing `=` is kept whole. The first
/// occurrence of a key wins.
pub fn parse_description(description: &str) -> DescriptionFields {
    let mut fields = DescriptionFields::default();
    for pair in description.split(';') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim().to_ascii_lowercase().as_str() {
            "title" if fields.title.is_none() => fields.title = Some(value.to_owned()),
            "author" | "artist" if fields.artist.is_none() => {
                fields.artist = Some(value.to_owned());
            }
            _ => {}
        }
    }
    fields
}
