//! Enumerated parameter values: cultures, text encodings, and the delimiter.

use encoding_rs::Encoding;

use super::parameter::ArgValue;

/// Number and list formatting rules for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Culture {
    /// Locale name (`ru-RU`). Empty for the invariant culture.
    pub name: &'static str,
    pub display_name: &'static str,
    /// Separator between list items, used as the default CSV delimiter.
    pub list_separator: u8,
    pub decimal_separator: char,
}

const fn culture(
    name: &'static str,
    display_name: &'static str,
    list_separator: u8,
    decimal_separator: char,
) -> Culture {
    Culture {
        name,
        display_name,
        list_separator,
        decimal_separator,
    }
}

/// Every supported culture. The invariant culture comes first.
pub const CULTURES: &[Culture] = &[
    culture("", "Invariant Language (Invariant Country)", b',', '.'),
    culture("be-BY", "Belarusian (Belarus)", b';', ','),
    culture("de", "German", b';', ','),
    culture("de-DE", "German (Germany)", b';', ','),
    culture("en", "English", b',', '.'),
    culture("en-GB", "English (United Kingdom)", b',', '.'),
    culture("en-US", "English (United States)", b',', '.'),
    culture("es-ES", "Spanish (Spain)", b';', ','),
    culture("fr-FR", "French (France)", b';', ','),
    culture("it-IT", "Italian (Italy)", b';', ','),
    culture("kk-KZ", "Kazakh (Kazakhstan)", b';', ','),
    culture("ru", "Russian", b';', ','),
    culture("ru-RU", "Russian (Russia)", b';', ','),
    culture("uk-UA", "Ukrainian (Ukraine)", b';', ','),
];

impl Default for Culture {
    fn default() -> Self {
        CULTURES[0]
    }
}

impl Culture {
    /// Look up a culture by name, ignoring case. `invariant` names the invariant culture.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let wanted = raw.trim();
        if wanted.eq_ignore_ascii_case("invariant") {
            return Ok(Self::default());
        }
        CULTURES
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| "unknown culture".to_string())
    }

    /// Names of all cultures except the invariant one.
    pub fn names() -> impl Iterator<Item = &'static str> {
        CULTURES.iter().skip(1).map(|c| c.name)
    }

    /// Parse a decimal number written with this culture's decimal separator.
    pub fn parse_number(&self, raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = trimmed.replace(self.decimal_separator, ".");
        normalized.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    /// Format a number with this culture's decimal separator.
    pub fn format_number(&self, value: f64) -> String {
        let text = value.to_string();
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}

impl ArgValue for Culture {
    fn parse_arg(raw: &str) -> Result<Self, String> {
        Culture::parse(raw)
    }
}

/// Encodings offered by `--show-encodings`.
const KNOWN_ENCODINGS: &[&Encoding] = &[
    encoding_rs::UTF_8,
    encoding_rs::UTF_16LE,
    encoding_rs::UTF_16BE,
    encoding_rs::WINDOWS_1251,
    encoding_rs::WINDOWS_1252,
    encoding_rs::KOI8_R,
    encoding_rs::KOI8_U,
    encoding_rs::IBM866,
    encoding_rs::ISO_8859_5,
    encoding_rs::X_MAC_CYRILLIC,
    encoding_rs::WINDOWS_1250,
    encoding_rs::ISO_8859_2,
];

/// Text encoding of the CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl Default for TextEncoding {
    fn default() -> Self {
        Self(encoding_rs::UTF_8)
    }
}

impl TextEncoding {
    /// Resolve a WHATWG encoding label such as `windows-1251` or `cp1251`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        Encoding::for_label(raw.trim().as_bytes())
            .map(Self)
            .ok_or_else(|| "unknown encoding".to_string())
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        KNOWN_ENCODINGS.iter().map(|e| e.name())
    }

    /// Decode file contents. A byte order mark overrides the configured encoding.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, used, had_errors) = self.0.decode(bytes);
        if used != self.0 {
            log::info!("Byte order mark found, decoding as {}", used.name());
        }
        if had_errors {
            log::warn!("Malformed {} sequences replaced", used.name());
        }
        text.into_owned()
    }

    /// Encode text for writing.
    ///
    /// UTF-16 targets are written as UTF-8, since encoders only exist for
    /// ASCII-compatible encodings.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, used, had_errors) = self.0.encode(text);
        if used != self.0 {
            log::warn!("{} cannot be written, using {}", self.0.name(), used.name());
        }
        if had_errors {
            log::warn!("Characters not representable in {} were escaped", used.name());
        }
        bytes.into_owned()
    }
}

impl ArgValue for TextEncoding {
    fn parse_arg(raw: &str) -> Result<Self, String> {
        TextEncoding::parse(raw)
    }
}

/// Single-byte CSV column delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        self.0
    }

    pub fn as_char(&self) -> char {
        char::from(self.0)
    }
}

impl From<u8> for Delimiter {
    fn from(byte: u8) -> Self {
        Self(byte)
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            b'\t' => f.write_str("\\t"),
            byte => write!(f, "{}", char::from(byte)),
        }
    }
}

impl ArgValue for Delimiter {
    fn parse_arg(raw: &str) -> Result<Self, String> {
        if raw == "\\t" || raw.eq_ignore_ascii_case("tab") {
            return Ok(Self(b'\t'));
        }
        match raw.as_bytes() {
            [byte] if byte.is_ascii() && !matches!(byte, b'"' | b'\n' | b'\r') => Ok(Self(*byte)),
            _ => Err("delimiter must be a single ASCII character".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_culture_parse_is_case_insensitive() {
        assert_eq!(Culture::parse("RU-ru").unwrap().name, "ru-RU");
        assert_eq!(Culture::parse("en-US").unwrap().list_separator, b',');
    }

    #[test]
    fn test_culture_parse_invariant() {
        assert_eq!(Culture::parse("invariant").unwrap(), Culture::default());
        assert_eq!(Culture::parse("").unwrap(), Culture::default());
    }

    #[test]
    fn test_culture_parse_unknown() {
        assert!(Culture::parse("xx-YY").is_err());
    }

    #[test]
    fn test_culture_names_skip_invariant() {
        let names: Vec<_> = Culture::names().collect();
        assert!(!names.contains(&""));
        assert!(names.contains(&"ru-RU"));
    }

    #[test]
    fn test_parse_number_with_comma_decimal() {
        let ru = Culture::parse("ru-RU").unwrap();
        assert_eq!(ru.parse_number("55,7512"), Some(55.7512));
        assert_eq!(ru.parse_number("-37,6"), Some(-37.6));
        assert_eq!(ru.parse_number(""), None);
        assert_eq!(ru.parse_number("north"), None);
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        let invariant = Culture::default();
        assert_eq!(invariant.parse_number("inf"), None);
        assert_eq!(invariant.parse_number("NaN"), None);
    }

    #[test]
    fn test_format_number_uses_decimal_separator() {
        let ru = Culture::parse("ru-RU").unwrap();
        assert_eq!(ru.format_number(55.75), "55,75");
        assert_eq!(Culture::default().format_number(55.75), "55.75");
    }

    #[test]
    fn test_encoding_parse_labels() {
        assert_eq!(TextEncoding::parse("cp1251").unwrap().name(), "windows-1251");
        assert_eq!(TextEncoding::parse("UTF-8").unwrap(), TextEncoding::default());
        assert!(TextEncoding::parse("no-such-encoding").is_err());
    }

    #[test]
    fn test_encoding_round_trip_cyrillic() {
        let cp1251 = TextEncoding::parse("windows-1251").unwrap();
        let bytes = cp1251.encode("Широта");
        assert_eq!(bytes.len(), 6);
        assert_eq!(cp1251.decode(&bytes), "Широта");
    }

    #[test]
    fn test_encoding_decode_honours_bom() {
        let cp1251 = TextEncoding::parse("windows-1251").unwrap();
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Долгота".as_bytes());
        assert_eq!(cp1251.decode(&bytes), "Долгота");
    }

    #[test]
    fn test_delimiter_parse() {
        assert_eq!(Delimiter::parse_arg(";").unwrap().as_char(), ';');
        assert_eq!(Delimiter::parse_arg("\\t").unwrap().as_byte(), b'\t');
        assert_eq!(Delimiter::parse_arg("tab").unwrap().as_byte(), b'\t');
        assert!(Delimiter::parse_arg(";;").is_err());
        assert!(Delimiter::parse_arg("\"").is_err());
        assert!(Delimiter::parse_arg("").is_err());
        assert!(Delimiter::parse_arg("№").is_err());
    }
}
