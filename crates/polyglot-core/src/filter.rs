//! Message eligibility filtering.
//!
//! Decides whether an inbound message should enter the translation router:
//! - bot-originated messages are skipped (we would re-translate our own output),
//! - non-allow-listed subtypes (edits, deletes, joins) are skipped,
//! - messages tagged with the loop-prevention marker are skipped,
//! - emoji-only messages are skipped (nothing to translate).

/// Glyph prefixed to every translation the bot posts. Messages starting with
/// it are never re-processed, which breaks the echo loop when our own output
/// comes back as an event.
pub const LOOP_MARKER: &str = "\u{1F310}";

/// Textual alias of the loop marker as Slack renders it in raw text.
pub const LOOP_MARKER_ALIAS: &str = ":globe_with_meridians:";

/// The only message subtype that still carries user-authored text.
const ALLOWED_SUBTYPE: &str = "file_share";

use crate::message::MessageEvent;

/// Whether an inbound message is eligible for translation.
pub fn is_eligible(msg: &MessageEvent) -> bool {
    if msg.bot_id.is_some() {
        return false;
    }
    if let Some(ref subtype) = msg.subtype {
        if subtype != ALLOWED_SUBTYPE {
            return false;
        }
    }
    if msg.text.starts_with(LOOP_MARKER) || msg.text.starts_with(LOOP_MARKER_ALIAS) {
        return false;
    }
    if is_emoji_only(&msg.text) {
        return false;
    }
    true
}

/// Normalize text for comparison and cache keys: lowercase, trim, collapse
/// internal whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `text` contains only emoji glyphs, emoji shortcodes, whitespace,
/// and basic punctuation.
pub fn is_emoji_only(text: &str) -> bool {
    let stripped = strip_shortcodes(text);
    stripped
        .chars()
        .all(|c| is_emoji_char(c) || c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
}

/// Remove Slack emoji shortcodes of the form `:name:` where the name is
/// drawn from `[A-Za-z0-9_+-]`.
fn strip_shortcodes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ':' {
            let mut j = i + 1;
            while j < chars.len() && is_shortcode_char(chars[j]) {
                j += 1;
            }
            if j > i + 1 && j < chars.len() && chars[j] == ':' {
                i = j + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn is_shortcode_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')
}

/// Unicode emoji ranges: emoticons, symbols, transport, dingbats, variation
/// selectors, regional-indicator flag pairs, and the pictograph extensions.
fn is_emoji_char(c: char) -> bool {
    matches!(c,
        '\u{1F600}'..='\u{1F64F}' // Emoticons
        | '\u{1F300}'..='\u{1F5FF}' // Misc Symbols and Pictographs
        | '\u{1F680}'..='\u{1F6FF}' // Transport
        | '\u{1F700}'..='\u{1F77F}' // Alchemical Symbols
        | '\u{1F780}'..='\u{1F7FF}' // Geometric Shapes Extended
        | '\u{1F800}'..='\u{1F8FF}' // Supplemental Arrows-C
        | '\u{1F900}'..='\u{1F9FF}' // Supplemental Symbols and Pictographs
        | '\u{1FA00}'..='\u{1FA6F}' // Chess Symbols
        | '\u{1FA70}'..='\u{1FAFF}' // Symbols and Pictographs Extended-A
        | '\u{2600}'..='\u{26FF}'   // Misc symbols
        | '\u{2700}'..='\u{27BF}'   // Dingbats
        | '\u{FE00}'..='\u{FE0F}'   // Variation Selectors
        | '\u{1F1E0}'..='\u{1F1FF}' // Regional indicators (flags)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn msg(text: &str) -> MessageEvent {
        MessageEvent {
            channel_id: "C123".into(),
            sender_id: "U123".into(),
            text: text.into(),
            ts: "1700000000.000100".into(),
            thread_ts: None,
            subtype: None,
            bot_id: None,
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_plain_text_eligible() {
        assert!(is_eligible(&msg("Merhaba dünya")));
        assert!(is_eligible(&msg("hello!")));
    }

    #[test]
    fn test_bot_message_ineligible() {
        let mut m = msg("hello");
        m.bot_id = Some("B001".into());
        assert!(!is_eligible(&m));
    }

    #[test]
    fn test_subtype_allowlist() {
        let mut m = msg("check out this file");
        m.subtype = Some("file_share".into());
        assert!(is_eligible(&m), "file_share carries user text");

        m.subtype = Some("message_changed".into());
        assert!(!is_eligible(&m));
        m.subtype = Some("channel_join".into());
        assert!(!is_eligible(&m));
    }

    #[test]
    fn test_loop_marker_ineligible_regardless_of_content() {
        assert!(!is_eligible(&msg("\u{1F310} Hello world")));
        assert!(!is_eligible(&msg(":globe_with_meridians: Hello world")));
    }

    #[test]
    fn test_emoji_only_ineligible() {
        assert!(!is_eligible(&msg("\u{1F600}\u{1F389}")));
        assert!(!is_eligible(&msg(":smile: :wave:")));
        assert!(!is_eligible(&msg("\u{1F1F9}\u{1F1F7}")), "flag pairs");
        assert!(!is_eligible(&msg("  ")));
        assert!(!is_eligible(&msg("")));
        assert!(!is_eligible(&msg("!?.,;:")));
        assert!(!is_eligible(&msg(":thumbsup: !! \u{2764}\u{FE0F}")));
    }

    #[test]
    fn test_emoji_with_text_eligible() {
        assert!(is_eligible(&msg("great job \u{1F389}")));
        assert!(is_eligible(&msg(":wave: hello")));
    }

    #[test]
    fn test_strip_shortcodes() {
        assert_eq!(strip_shortcodes(":smile:"), "");
        assert_eq!(strip_shortcodes("a :smile: b"), "a  b");
        assert_eq!(strip_shortcodes(":+1::-1:"), "");
        assert_eq!(strip_shortcodes("10:30"), "10:30", "plain colon survives");
        assert_eq!(strip_shortcodes(":notclosed"), ":notclosed");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Hello   World "), "hello world");
        assert_eq!(normalize("HELLO"), "hello");
        assert_eq!(normalize(""), "");
    }
}
