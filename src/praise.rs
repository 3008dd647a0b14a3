use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One praise-song entry: a title plus an optional sheet-music image URL.
///
/// Cards are never persisted on their own; they exist only as the decoded
/// form of a bulletin's `praises` text field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PraiseCard {
    pub title: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl PraiseCard {
    pub fn new(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: image_url.into(),
        }
    }

    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// Serialize a card list into the stored `praises` text form.
///
/// An empty list encodes to the empty string; anything else becomes a JSON
/// array of `{title, imageUrl}` objects in display order. The legacy
/// `# Title`-per-line form is read-only and never re-emitted.
pub fn encode(cards: &[PraiseCard]) -> String {
    if cards.is_empty() {
        return String::new();
    }
    serde_json::to_string(cards).unwrap_or_default()
}

/// Parse a stored `praises` value back into cards.
///
/// Decoding never fails: blank input, malformed JSON, or a non-array payload
/// all yield an empty list so the viewer degrades instead of erroring.
pub fn decode(value: &str) -> Vec<PraiseCard> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if !trimmed.starts_with('[') {
        return decode_legacy_lines(trimmed);
    }

    let Ok(parsed) = serde_json::from_str::<Value>(trimmed) else {
        return Vec::new();
    };
    let Value::Array(items) = parsed else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| PraiseCard {
            title: string_field(item, "title"),
            image_url: string_field(item, "imageUrl"),
        })
        .collect()
}

/// The ordered sub-sequence of cards that carry a sheet-music image.
pub fn image_cards(cards: &[PraiseCard]) -> Vec<PraiseCard> {
    cards
        .iter()
        .filter(|card| card.has_image())
        .cloned()
        .collect()
}

// Pre-JSON convention: one song per line, optionally prefixed with `#`.
fn decode_legacy_lines(text: &str) -> Vec<PraiseCard> {
    text.lines()
        .filter_map(|line| {
            let stripped = line
                .strip_prefix('#')
                .map(str::trim_start)
                .unwrap_or(line)
                .trim();
            if stripped.is_empty() {
                None
            } else {
                Some(PraiseCard::new(stripped, ""))
            }
        })
        .collect()
}

fn string_field(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_encodes_to_empty_string() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode(""), Vec::new());
        assert_eq!(decode("   \n\t "), Vec::new());
    }

    #[test]
    fn round_trips_non_empty_sequences() {
        let cards = vec![
            PraiseCard::new("찬양하세", "https://cdn.example/a.png"),
            PraiseCard::new("", ""),
            PraiseCard::new("온 땅의 주인 \"quoted\" \\ slash", "/uploads/b.jpg"),
        ];
        assert_eq!(decode(&encode(&cards)), cards);
    }

    #[test]
    fn legacy_lines_strip_hash_and_drop_blanks() {
        let decoded = decode("# Song A\n#Song B\n\n");
        assert_eq!(
            decoded,
            vec![PraiseCard::new("Song A", ""), PraiseCard::new("Song B", "")]
        );
    }

    #[test]
    fn hash_only_line_disappears() {
        assert_eq!(decode("#   \n# Real"), vec![PraiseCard::new("Real", "")]);
    }

    #[test]
    fn plain_text_falls_through_to_legacy_parsing() {
        assert_eq!(
            decode("not json and not a line list"),
            vec![PraiseCard::new("not json and not a line list", "")]
        );
    }

    #[test]
    fn invalid_json_yields_empty_list() {
        assert_eq!(decode("[not valid json"), Vec::new());
    }

    #[test]
    fn non_array_json_yields_empty_list() {
        assert_eq!(decode("[]"), Vec::new());
        assert_eq!(decode("[1, \"two\", null]").len(), 3);
        // Non-object elements coerce both fields to empty strings.
        assert!(
            decode("[1, \"two\", null]")
                .iter()
                .all(|c| c.title.is_empty() && c.image_url.is_empty())
        );
    }

    #[test]
    fn non_string_fields_coerce_to_empty() {
        let decoded = decode(r#"[{"title": 7, "imageUrl": "/uploads/x.png"}]"#);
        assert_eq!(decoded, vec![PraiseCard::new("", "/uploads/x.png")]);
    }

    #[test]
    fn image_cards_keeps_order_and_filters() {
        let cards = vec![
            PraiseCard::new("a", ""),
            PraiseCard::new("b", "/uploads/b.png"),
            PraiseCard::new("c", "/uploads/c.png"),
        ];
        let images = image_cards(&cards);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].title, "b");
        assert_eq!(images[1].title, "c");
    }
}
