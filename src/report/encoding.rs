//! Charset handling for source reading and report writing.
//!
//! Encoding fallback diverged between report formats in earlier versions of
//! this tool, so the precedence chain lives in exactly one place:
//! [`resolve`]: per-report encoding, else run-level encoding, else the
//! platform default. Every render site goes through it.

use thiserror::Error;

/// The closed set of charsets the tool reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    UsAscii,
    Iso8859_1,
    Iso8859_15,
    Utf16Be,
    Utf16Le,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported encoding '{0}'")]
pub struct UnknownEncoding(pub String);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("character '{ch}' has no mapping in {encoding}")]
pub struct EncodeError {
    pub ch: char,
    pub encoding: &'static str,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {encoding} byte sequence at offset {offset}")]
pub struct DecodeError {
    pub offset: usize,
    pub encoding: &'static str,
}

/// Resolve the encoding for one render: explicit per-report label, else the
/// run-level encoding, else the platform default. Evaluated once per render,
/// never cached.
pub fn resolve(
    report_encoding: Option<&str>,
    run_encoding: Option<Encoding>,
) -> Result<Encoding, UnknownEncoding> {
    match report_encoding {
        Some(label) => Encoding::from_label(label),
        None => Ok(run_encoding.unwrap_or(Encoding::PLATFORM_DEFAULT)),
    }
}

impl Encoding {
    /// What an unconfigured run reads and writes.
    pub const PLATFORM_DEFAULT: Encoding = Encoding::Utf8;

    pub fn from_label(label: &str) -> Result<Encoding, UnknownEncoding> {
        let normalized: String = label
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "UTF8" => Ok(Encoding::Utf8),
            "USASCII" | "ASCII" => Ok(Encoding::UsAscii),
            "ISO88591" | "LATIN1" => Ok(Encoding::Iso8859_1),
            "ISO885915" | "LATIN9" => Ok(Encoding::Iso8859_15),
            "UTF16" | "UTF16BE" => Ok(Encoding::Utf16Be),
            "UTF16LE" => Ok(Encoding::Utf16Le),
            _ => Err(UnknownEncoding(label.to_string())),
        }
    }

    /// Canonical charset name, as written into XML declarations.
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::UsAscii => "US-ASCII",
            Encoding::Iso8859_1 => "ISO-8859-1",
            Encoding::Iso8859_15 => "ISO-8859-15",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf16Le => "UTF-16LE",
        }
    }

    /// Encode text for writing. An unmappable character is a hard error;
    /// silent replacement would corrupt reports.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, EncodeError> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::UsAscii => text
                .chars()
                .map(|ch| {
                    if ch.is_ascii() {
                        Ok(ch as u8)
                    } else {
                        Err(EncodeError {
                            ch,
                            encoding: self.label(),
                        })
                    }
                })
                .collect(),
            Encoding::Iso8859_1 => text
                .chars()
                .map(|ch| {
                    let code = ch as u32;
                    if code <= 0xFF {
                        Ok(code as u8)
                    } else {
                        Err(EncodeError {
                            ch,
                            encoding: self.label(),
                        })
                    }
                })
                .collect(),
            Encoding::Iso8859_15 => text
                .chars()
                .map(|ch| {
                    latin9_byte(ch).ok_or(EncodeError {
                        ch,
                        encoding: self.label(),
                    })
                })
                .collect(),
            Encoding::Utf16Be => Ok(text
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect()),
            Encoding::Utf16Le => Ok(text
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect()),
        }
    }

    /// Decode source file bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| DecodeError {
                offset: e.utf8_error().valid_up_to(),
                encoding: self.label(),
            }),
            Encoding::UsAscii => bytes
                .iter()
                .enumerate()
                .map(|(offset, &b)| {
                    if b < 0x80 {
                        Ok(b as char)
                    } else {
                        Err(DecodeError {
                            offset,
                            encoding: self.label(),
                        })
                    }
                })
                .collect(),
            Encoding::Iso8859_1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Encoding::Iso8859_15 => Ok(bytes.iter().map(|&b| latin9_char(b)).collect()),
            Encoding::Utf16Be | Encoding::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(DecodeError {
                        offset: bytes.len() - 1,
                        encoding: self.label(),
                    });
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| {
                        let pair = [pair[0], pair[1]];
                        if *self == Encoding::Utf16Be {
                            u16::from_be_bytes(pair)
                        } else {
                            u16::from_le_bytes(pair)
                        }
                    })
                    .collect();
                String::from_utf16(&units).map_err(|_| DecodeError {
                    offset: 0,
                    encoding: self.label(),
                })
            }
        }
    }
}

/// ISO-8859-15 is Latin-1 with eight codepoints swapped out (most visibly
/// the euro sign at 0xA4).
fn latin9_byte(ch: char) -> Option<u8> {
    match ch {
        '\u{20AC}' => Some(0xA4),
        '\u{0160}' => Some(0xA6),
        '\u{0161}' => Some(0xA8),
        '\u{017D}' => Some(0xB4),
        '\u{017E}' => Some(0xB8),
        '\u{0152}' => Some(0xBC),
        '\u{0153}' => Some(0xBD),
        '\u{0178}' => Some(0xBE),
        '\u{A4}' | '\u{A6}' | '\u{A8}' | '\u{B4}' | '\u{B8}' | '\u{BC}' | '\u{BD}' | '\u{BE}' => {
            None
        }
        ch if (ch as u32) <= 0xFF => Some(ch as u8),
        _ => None,
    }
}

fn latin9_char(byte: u8) -> char {
    match byte {
        0xA4 => '\u{20AC}',
        0xA6 => '\u{0160}',
        0xA8 => '\u{0161}',
        0xB4 => '\u{017D}',
        0xB8 => '\u{017E}',
        0xBC => '\u{0152}',
        0xBD => '\u{0153}',
        0xBE => '\u{0178}',
        b => b as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_encoding_wins_over_run_encoding() {
        let resolved = resolve(Some("ISO-8859-1"), Some(Encoding::Iso8859_15)).unwrap();
        assert_eq!(resolved, Encoding::Iso8859_1);
    }

    #[test]
    fn run_encoding_wins_over_platform_default() {
        let resolved = resolve(None, Some(Encoding::Iso8859_1)).unwrap();
        assert_eq!(resolved, Encoding::Iso8859_1);
    }

    #[test]
    fn report_encoding_alone_is_used() {
        let resolved = resolve(Some("ISO-8859-15"), None).unwrap();
        assert_eq!(resolved, Encoding::Iso8859_15);
    }

    #[test]
    fn nothing_set_falls_back_to_platform_default() {
        let resolved = resolve(None, None).unwrap();
        assert_eq!(resolved, Encoding::PLATFORM_DEFAULT);
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!(resolve(Some("EBCDIC-1047"), None).is_err());
        assert!(Encoding::from_label("KOI8-R").is_err());
    }

    #[test]
    fn labels_parse_case_and_dash_insensitively() {
        assert_eq!(Encoding::from_label("utf-8").unwrap(), Encoding::Utf8);
        assert_eq!(Encoding::from_label("utf8").unwrap(), Encoding::Utf8);
        assert_eq!(
            Encoding::from_label("iso_8859_15").unwrap(),
            Encoding::Iso8859_15
        );
        assert_eq!(Encoding::from_label("latin1").unwrap(), Encoding::Iso8859_1);
    }

    #[test]
    fn latin1_round_trips_its_full_range() {
        let text: String = (0x20u8..=0xFF).map(|b| b as char).collect();
        let bytes = Encoding::Iso8859_1.encode(&text).unwrap();
        assert_eq!(Encoding::Iso8859_1.decode(&bytes).unwrap(), text);
    }

    #[test]
    fn latin9_maps_the_euro_sign() {
        assert_eq!(Encoding::Iso8859_15.encode("€").unwrap(), vec![0xA4]);
        assert_eq!(Encoding::Iso8859_15.decode(&[0xA4]).unwrap(), "€");
        // The currency sign it displaced is unmappable now.
        assert!(Encoding::Iso8859_15.encode("\u{A4}").is_err());
    }

    #[test]
    fn ascii_rejects_non_ascii_instead_of_replacing() {
        let err = Encoding::UsAscii.encode("naïve").unwrap_err();
        assert_eq!(err.ch, 'ï');
    }

    #[test]
    fn utf16_encodes_with_requested_byte_order() {
        assert_eq!(Encoding::Utf16Be.encode("A").unwrap(), vec![0x00, 0x41]);
        assert_eq!(Encoding::Utf16Le.encode("A").unwrap(), vec![0x41, 0x00]);
    }
}
