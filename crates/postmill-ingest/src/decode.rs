//! Byte decoding for uploaded files.
//!
//! Uploads arrive in whatever encoding the author's editor used, so decoding
//! walks a fixed table of candidates and keeps the first clean decode. Latin-1
//! maps every byte, which makes the table total in practice.

use encoding_rs::{Encoding, GBK};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// An encoding the decoder can produce text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
    Utf8,
    Gbk,
    Gb2312,
    Utf8Bom,
    Latin1,
    /// UTF-8 with invalid sequences dropped.
    Utf8Lossy,
}

/// Candidate encodings, in the order they are tried.
pub const DECODE_ORDER: [SourceEncoding; 5] = [
    SourceEncoding::Utf8,
    SourceEncoding::Gbk,
    SourceEncoding::Gb2312,
    SourceEncoding::Utf8Bom,
    SourceEncoding::Latin1,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl SourceEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Gbk => "gbk",
            SourceEncoding::Gb2312 => "gb2312",
            SourceEncoding::Utf8Bom => "utf-8-sig",
            SourceEncoding::Latin1 => "latin-1",
            SourceEncoding::Utf8Lossy => "utf-8-lossy",
        }
    }

    /// Strict decode: `None` on the first malformed sequence.
    fn try_decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            SourceEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            SourceEncoding::Gbk => decode_gbk(GBK, bytes),
            // encoding_rs folds the gb2312 label into its GBK decoder, so this
            // step only ever repeats the GBK result; GB2312 is a subset of GBK
            SourceEncoding::Gb2312 => Encoding::for_label(b"gb2312")
                .and_then(|encoding| decode_gbk(encoding, bytes)),
            SourceEncoding::Utf8Bom => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_owned)
            }
            SourceEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            SourceEncoding::Utf8Lossy => Some(decode_utf8_dropping_invalid(bytes)),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decoded text plus the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: SourceEncoding,
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Strict GBK. The encoding_rs decoder is really GB18030 and also accepts
/// four-byte sequences, which plain GBK does not have.
fn decode_gbk(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    if has_four_byte_sequence(bytes) {
        return None;
    }
    decode_strict(encoding, bytes)
}

/// Whether `bytes` contains a GB18030 four-byte sequence (lead byte then an ASCII digit).
fn has_four_byte_sequence(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x81..=0xFE => {
                if matches!(bytes.get(i + 1), Some(0x30..=0x39)) {
                    return true;
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    false
}

fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Decode raw bytes into NUL-free text. Never fails.
pub fn decode(bytes: &[u8]) -> Decoded {
    let (text, encoding) = DECODE_ORDER
        .iter()
        .find_map(|&encoding| encoding.try_decode(bytes).map(|text| (text, encoding)))
        .unwrap_or_else(|| {
            (
                decode_utf8_dropping_invalid(bytes),
                SourceEncoding::Utf8Lossy,
            )
        });

    debug!("Decoded {} bytes as {}", bytes.len(), encoding);

    let text = if text.contains('\0') {
        text.replace('\0', "")
    } else {
        text
    };

    Decoded { text, encoding }
}

/// Decode raw bytes, discarding which encoding matched.
pub fn decode_text(bytes: &[u8]) -> String {
    decode(bytes).text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_first() {
        let decoded = decode("# 标题\n正文".as_bytes());
        assert_eq!(decoded.encoding, SourceEncoding::Utf8);
        assert_eq!(decoded.text, "# 标题\n正文");
    }

    #[test]
    fn test_gbk_fallback() {
        // "中文" in GBK is not valid UTF-8
        let decoded = decode(&[0xD6, 0xD0, 0xCE, 0xC4]);
        assert_eq!(decoded.encoding, SourceEncoding::Gbk);
        assert_eq!(decoded.text, "中文");
    }

    #[test]
    fn test_gb18030_four_byte_is_not_gbk() {
        // Valid GB18030 but not GBK, so it lands on Latin-1
        let bytes = [0x81, 0x30, 0x81, 0x30];
        assert!(SourceEncoding::Gbk.try_decode(&bytes).is_none());
        assert!(SourceEncoding::Gb2312.try_decode(&bytes).is_none());

        let decoded = decode(&bytes);
        assert_eq!(decoded.encoding, SourceEncoding::Latin1);
        assert_eq!(decoded.text, "\u{81}0\u{81}0");

        // Two-byte text alongside ASCII digits still decodes as GBK
        let decoded = decode(&[0xD6, 0xD0, b'1', b'2']);
        assert_eq!(decoded.encoding, SourceEncoding::Gbk);
        assert_eq!(decoded.text, "中12");
    }

    #[test]
    fn test_latin1_fallback() {
        // Truncated multi-byte sequence: invalid as UTF-8 and as GBK
        let decoded = decode(b"caf\xE9");
        assert_eq!(decoded.encoding, SourceEncoding::Latin1);
        assert_eq!(decoded.text, "café");

        let decoded = decode(b"\xFFA");
        assert_eq!(decoded.encoding, SourceEncoding::Latin1);
        assert_eq!(decoded.text, "\u{FF}A");
    }

    #[test]
    fn test_bom_kept_by_plain_utf8() {
        // Plain UTF-8 is tried first and accepts the BOM as a character
        let decoded = decode(b"\xEF\xBB\xBFhello");
        assert_eq!(decoded.encoding, SourceEncoding::Utf8);
        assert_eq!(decoded.text, "\u{FEFF}hello");
    }

    #[test]
    fn test_strips_nul() {
        assert_eq!(decode_text(b"a\0b\0"), "ab");
        assert_eq!(decode_text(b"\0\0"), "");
        // NUL survives the Latin-1 path too
        assert_eq!(decode_text(b"\0caf\xE9"), "café");
    }

    #[test]
    fn test_any_bytes_decode_without_nul() {
        let all: Vec<u8> = (0..=255u8).collect();
        let mut samples = vec![Vec::new(), all.clone()];
        samples.extend(all.chunks(7).map(|c| c.to_vec()));
        samples.push(all.iter().rev().copied().collect());

        for sample in samples {
            let text = decode_text(&sample);
            assert!(!text.contains('\0'));
        }
    }

    #[test]
    fn test_lossy_drops_invalid() {
        assert_eq!(decode_utf8_dropping_invalid(b"ok\xFF\xFEgo"), "okgo");
        assert_eq!(
            SourceEncoding::Utf8Lossy.try_decode(b"\xC3"),
            Some(String::new())
        );
    }

    #[test]
    fn test_order_is_fixed() {
        assert_eq!(DECODE_ORDER[0], SourceEncoding::Utf8);
        assert_eq!(DECODE_ORDER[4], SourceEncoding::Latin1);
        assert_eq!(SourceEncoding::Gb2312.as_str(), "gb2312");
    }
}
