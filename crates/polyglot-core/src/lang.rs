//! Language name resolution and flag glyphs.

/// Resolve a human-readable language name to an ISO-639-1-like code.
///
/// Case-insensitive. Unknown input is returned unchanged: callers may pass
/// already-canonical codes, and user typos are forwarded to the provider
/// rather than rejected here.
pub fn resolve(input: &str) -> String {
    match input.to_lowercase().as_str() {
        "english" => "en",
        "spanish" => "es",
        "french" => "fr",
        "german" => "de",
        "italian" => "it",
        "portuguese" => "pt",
        "russian" => "ru",
        "japanese" => "ja",
        "korean" => "ko",
        "chinese" => "zh",
        "arabic" => "ar",
        "turkish" => "tr",
        _ => return input.to_string(),
    }
    .to_string()
}

/// Flag glyph for a language code, with a generic globe fallback.
pub fn flag(code: &str) -> &'static str {
    match code {
        "en" => "\u{1F1FA}\u{1F1F8}",
        "tr" => "\u{1F1F9}\u{1F1F7}",
        "es" => "\u{1F1EA}\u{1F1F8}",
        "fr" => "\u{1F1EB}\u{1F1F7}",
        "de" => "\u{1F1E9}\u{1F1EA}",
        "it" => "\u{1F1EE}\u{1F1F9}",
        "pt" => "\u{1F1F5}\u{1F1F9}",
        "ru" => "\u{1F1F7}\u{1F1FA}",
        "ja" => "\u{1F1EF}\u{1F1F5}",
        "ko" => "\u{1F1F0}\u{1F1F7}",
        "zh" => "\u{1F1E8}\u{1F1F3}",
        "ar" => "\u{1F1F8}\u{1F1E6}",
        _ => "\u{1F310}",
    }
}
