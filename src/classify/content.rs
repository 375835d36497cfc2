//! Decoding file bytes through an ordered encoding chain, and binary sniffing.

use serde::{Deserialize, Serialize};

/// A text encoding the classifier can try.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "cp1252")]
    Cp1252,
    #[serde(rename = "ascii")]
    Ascii,
}

/// CP1252 code points for bytes 0x80..=0x9F; `None` marks undefined bytes.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl TextEncoding {
    /// Name as written in config files and reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Cp1252 => "cp1252",
            Self::Ascii => "ascii",
        }
    }

    /// Strict decode; `None` if any byte is invalid for this encoding.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
                    _ => Some(char::from(b)),
                })
                .collect(),
            Self::Ascii => bytes.is_ascii().then(|| bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of decoding a file's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Text decoded by the first encoding in the chain that accepted it.
    Text {
        /// The decoded content.
        text: String,
        /// Which encoding succeeded.
        encoding: TextEncoding,
    },
    /// Decoded, but a NUL appears in the sniffed head.
    Binary,
    /// No encoding in the chain accepted the bytes.
    Undecodable,
}

/// Decodes `bytes` with the first accepting encoding, then sniffs the first
/// `sniff_chars` characters for NUL.
#[must_use]
pub fn decode(bytes: &[u8], encodings: &[TextEncoding], sniff_chars: usize) -> Decoded {
    let Some((text, encoding)) =
        encodings.iter().find_map(|enc| enc.decode(bytes).map(|text| (text, *enc)))
    else {
        return Decoded::Undecodable;
    };
    if text.chars().take(sniff_chars).any(|c| c == '\0') {
        return Decoded::Binary;
    }
    Decoded::Text { text, encoding }
}

/// Lines that contain something other than whitespace.
#[must_use]
pub fn useful_lines(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Total line count: newlines plus one.
#[must_use]
pub fn total_lines(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// The first `max_chars` characters, and whether anything was cut.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (text[..idx].to_string(), true),
        None => (text.to_string(), false),
    }
}
