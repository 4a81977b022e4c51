//! Reconstruction of private-individual names from the legacy packed format.
//!
//! A legacy name is stored as `remainder_name` followed by the reversed
//! `reverse_name`, with all punctuation removed. Each byte of the
//! `punctuation_code` hex string re-inserts one punctuation mark: the low bits
//! count characters to copy, the high bits select the symbol. A `*` marks the
//! start of the surname.

use serde::{Deserialize, Serialize};

use super::DecodeError;

/// Punctuation symbols indexed by the high bits of a code byte
pub const PUNCTUATION_SYMBOLS: [&str; 7] = ["&", " ", "-", "'", "(", ")", "*"];

const SURNAME_MARKER: char = '*';

/// How a code byte splits between copy length and symbol index.
///
/// Two legacy eras exist. `Keyed` matches the sampled production rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationScheme {
    /// Low 5 bits are the length, the top 3 bits the symbol
    #[default]
    Keyed,
    /// Low 4 bits are the length, the top 4 bits the symbol
    Narrow,
}

impl PunctuationScheme {
    fn length_bits(self) -> u32 {
        match self {
            PunctuationScheme::Keyed => 5,
            PunctuationScheme::Narrow => 4,
        }
    }

    /// Decode one two-digit hex code into `(symbol, length)`
    pub fn decode(self, code: &str) -> Result<(&'static str, usize), DecodeError> {
        let invalid = || DecodeError::InvalidPunctuationHex {
            code: code.to_string(),
        };
        // from_str_radix alone would let a leading '+' through
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = u8::from_str_radix(code, 16).map_err(|_| invalid())?;
        let bits = self.length_bits();
        let length = (byte & ((1u8 << bits) - 1)) as usize;
        let index = (byte >> bits) as usize;

        PUNCTUATION_SYMBOLS
            .get(index)
            .map(|symbol| (*symbol, length))
            .ok_or(DecodeError::UnmappedPunctuation {
                code: code.to_string(),
                index,
            })
    }
}

impl std::str::FromStr for PunctuationScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyed" => Ok(PunctuationScheme::Keyed),
            "narrow" => Ok(PunctuationScheme::Narrow),
            other => Err(format!("unknown punctuation scheme '{}'", other)),
        }
    }
}

/// A reconstructed private name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedName {
    pub full_name: String,
    pub forenames: Vec<String>,
    pub surname: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NameDecoder {
    scheme: PunctuationScheme,
}

impl NameDecoder {
    pub fn new(scheme: PunctuationScheme) -> Self {
        Self { scheme }
    }

    /// Rebuild the punctuated name and split it into forenames and surname
    pub fn decode(
        &self,
        punctuation_code: &str,
        remainder_name: &str,
        reverse_name: &str,
    ) -> Result<DecodedName, DecodeError> {
        let full_name = self.reconstruct(punctuation_code, remainder_name, reverse_name)?;

        let (forenames, surname) = match full_name.split_once(SURNAME_MARKER) {
            Some((forenames, surname)) => (forenames, surname.to_string()),
            None => (full_name.as_str(), String::new()),
        };
        let forenames = forenames.split_whitespace().map(str::to_string).collect();

        Ok(DecodedName {
            full_name,
            forenames,
            surname,
        })
    }

    fn reconstruct(
        &self,
        punctuation_code: &str,
        remainder_name: &str,
        reverse_name: &str,
    ) -> Result<String, DecodeError> {
        let punctuation_code = punctuation_code.trim();
        if punctuation_code.len() % 2 != 0 {
            return Err(DecodeError::OddPunctuationLength {
                code: punctuation_code.to_string(),
            });
        }

        let mut remaining: Vec<char> = remainder_name
            .chars()
            .chain(reverse_name.chars().rev())
            .collect();
        let mut name = String::with_capacity(remaining.len() + punctuation_code.len() / 2);

        let codes = punctuation_code.as_bytes().chunks(2);
        for pair in codes {
            let code = std::str::from_utf8(pair).map_err(|_| DecodeError::InvalidPunctuationHex {
                code: String::from_utf8_lossy(pair).into_owned(),
            })?;
            let (symbol, length) = self.scheme.decode(code)?;
            let take = length.min(remaining.len());
            name.extend(remaining.drain(..take));
            name.push_str(symbol);
        }
        name.extend(remaining);

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_every_byte(scheme: PunctuationScheme, length_bits: u32) {
        for byte in 0u8..=255 {
            let code = format!("{:02X}", byte);
            let index = (byte >> length_bits) as usize;
            let length = (byte & ((1u8 << length_bits) - 1)) as usize;

            match scheme.decode(&code) {
                Ok((symbol, decoded_length)) => {
                    assert!(index < 7, "{} should be unmapped", code);
                    assert_eq!(symbol, PUNCTUATION_SYMBOLS[index], "symbol for {}", code);
                    assert_eq!(decoded_length, length, "length for {}", code);
                }
                Err(DecodeError::UnmappedPunctuation { index: reported, .. }) => {
                    assert!(index >= 7, "{} should decode", code);
                    assert_eq!(reported, index);
                }
                Err(other) => panic!("unexpected error for {}: {:?}", code, other),
            }
        }
    }

    #[test]
    fn test_keyed_every_byte() {
        check_every_byte(PunctuationScheme::Keyed, 5);
    }

    #[test]
    fn test_narrow_every_byte() {
        check_every_byte(PunctuationScheme::Narrow, 4);
    }

    #[test]
    fn test_keyed_top_bits_out_of_table() {
        let err = PunctuationScheme::Keyed.decode("E3").unwrap_err();
        assert!(matches!(err, DecodeError::UnmappedPunctuation { index: 7, .. }));
    }

    #[test]
    fn test_narrow_scheme_split() {
        assert_eq!(PunctuationScheme::Narrow.decode("2C").unwrap(), ("-", 12));
        assert_eq!(PunctuationScheme::Narrow.decode("03").unwrap(), ("&", 3));
        assert!(PunctuationScheme::Narrow.decode("7F").is_err());
    }

    #[test]
    fn test_signed_pair_is_not_hex() {
        for code in ["+4", "+F", "-1", " 4"] {
            let err = PunctuationScheme::Keyed.decode(code).unwrap_err();
            assert!(matches!(err, DecodeError::InvalidPunctuationHex { .. }), "{}", code);
        }
        let err = NameDecoder::default().decode("+4", "JOHNSMITH", "").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPunctuationHex { .. }));
    }

    #[test]
    fn test_invalid_hex_pair() {
        let err = PunctuationScheme::Keyed.decode("G1").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPunctuationHex { .. }));
    }

    #[test]
    fn test_sampled_row_decodes() {
        let decoder = NameDecoder::default();
        let name = decoder.decode("28C6", "STANFOR", "YDRUPYDDERFD").unwrap();

        assert_eq!(name.full_name, "STANFORD FREDDY*PURDY");
        assert_eq!(name.forenames, vec!["STANFORD", "FREDDY"]);
        assert_eq!(name.surname, "PURDY");
    }

    #[test]
    fn test_no_surname_marker_means_all_forenames() {
        let decoder = NameDecoder::default();
        // 0x24: space after 4 characters
        let name = decoder.decode("24", "JOHN", "HTIMS").unwrap();

        assert_eq!(name.full_name, "JOHN SMITH");
        assert_eq!(name.forenames, vec!["JOHN", "SMITH"]);
        assert_eq!(name.surname, "");
    }

    #[test]
    fn test_empty_punctuation_copies_name_verbatim() {
        let decoder = NameDecoder::default();
        let name = decoder.decode("", "AB", "DC").unwrap();
        assert_eq!(name.full_name, "ABCD");
    }

    #[test]
    fn test_length_past_end_is_clamped() {
        let decoder = NameDecoder::default();
        // 0xDF: surname marker after 31 characters, more than the name holds
        let name = decoder.decode("DF", "SHORT", "").unwrap();
        assert_eq!(name.full_name, "SHORT*");
        assert_eq!(name.surname, "");
    }

    #[test]
    fn test_odd_length_code_is_rejected() {
        let decoder = NameDecoder::default();
        let err = decoder.decode("28C", "STANFOR", "YDRUPYDDERFD").unwrap_err();
        assert!(matches!(err, DecodeError::OddPunctuationLength { .. }));
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let decoder = NameDecoder::new(PunctuationScheme::Keyed);
        let first = decoder.decode("28C6", "STANFOR", "YDRUPYDDERFD").unwrap();
        let second = decoder.decode("28C6", "STANFOR", "YDRUPYDDERFD").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("Narrow".parse::<PunctuationScheme>().unwrap(), PunctuationScheme::Narrow);
        assert!("wide".parse::<PunctuationScheme>().is_err());
    }
}
