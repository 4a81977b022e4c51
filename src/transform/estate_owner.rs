use tracing::debug;

use super::name_decoder::NameDecoder;
use super::DecodeError;
use crate::constants::UNKNOWN_AREA;
use crate::domain::{NameDetail, NameType, PartyName, RawLegacyRow};

/// Which discriminator bytes select a rule
#[derive(Debug, Clone, PartialEq, Eq)]
enum Discriminator {
    /// Last hex pair is one of the codes
    Suffix(Vec<String>),
    /// Last and first hex pairs both match
    SuffixAndPrefix { suffix: String, prefix: String },
}

impl Discriminator {
    fn suffix(code: &str) -> Self {
        Discriminator::Suffix(vec![code.to_string()])
    }

    fn matches(&self, hex: &str) -> bool {
        let hex = hex.trim().to_ascii_uppercase();
        if hex.len() < 2 || !hex.is_char_boundary(hex.len() - 2) {
            return false;
        }
        let last = &hex[hex.len() - 2..];
        match self {
            Discriminator::Suffix(codes) => codes.iter().any(|code| code.eq_ignore_ascii_case(last)),
            Discriminator::SuffixAndPrefix { suffix, prefix } => {
                suffix.eq_ignore_ascii_case(last) && hex.get(..2).map_or(false, |first| prefix.eq_ignore_ascii_case(first))
            }
        }
    }
}

type NameBuilder = fn(&RawLegacyRow) -> Result<NameDetail, DecodeError>;

struct OwnerRule {
    name_type: NameType,
    discriminator: Discriminator,
    build: NameBuilder,
}

/// Picks the owner's entity kind from the discriminator byte of the primary row.
///
/// Rules are tried in order and the first match wins; anything unmatched is
/// decoded as a private individual.
pub struct EstateOwnerClassifier {
    rules: Vec<OwnerRule>,
    decoder: NameDecoder,
}

impl EstateOwnerClassifier {
    pub fn new(decoder: NameDecoder, development_corporation_codes: &[String]) -> Self {
        let rules = vec![
            OwnerRule {
                name_type: NameType::CountyCouncil,
                discriminator: Discriminator::suffix("01"),
                build: authority_name,
            },
            OwnerRule {
                name_type: NameType::RuralCouncil,
                discriminator: Discriminator::suffix("02"),
                build: authority_name,
            },
            OwnerRule {
                name_type: NameType::ParishCouncil,
                discriminator: Discriminator::suffix("04"),
                build: authority_name,
            },
            OwnerRule {
                name_type: NameType::OtherCouncil,
                discriminator: Discriminator::suffix("08"),
                build: authority_name,
            },
            OwnerRule {
                name_type: NameType::DevelopmentCorporation,
                discriminator: Discriminator::Suffix(development_corporation_codes.to_vec()),
                build: other_name,
            },
            OwnerRule {
                name_type: NameType::LimitedCompany,
                discriminator: Discriminator::suffix("F1"),
                build: company_name,
            },
            OwnerRule {
                name_type: NameType::Other,
                discriminator: Discriminator::suffix("F2"),
                build: other_name,
            },
            OwnerRule {
                name_type: NameType::ComplexName,
                discriminator: Discriminator::SuffixAndPrefix {
                    suffix: "F3".to_string(),
                    prefix: "F9".to_string(),
                },
                build: complex_name,
            },
        ];

        Self { rules, decoder }
    }

    /// Build the party name for a raw row
    pub fn classify(&self, row: &RawLegacyRow) -> Result<PartyName, DecodeError> {
        for rule in &self.rules {
            if rule.discriminator.matches(&row.reverse_name_hex) {
                debug!("EO name is {}", rule.name_type.label());
                return Ok(PartyName {
                    name_type: rule.name_type,
                    detail: (rule.build)(row)?,
                });
            }
        }

        debug!("EO name is Private Individual");
        let decoded = self
            .decoder
            .decode(&row.punctuation_code, &row.remainder_name, &row.reverse_name)?;
        Ok(PartyName {
            name_type: NameType::PrivateIndividual,
            detail: NameDetail::Private {
                forenames: decoded.forenames,
                surname: decoded.surname,
            },
        })
    }
}

fn authority_name(row: &RawLegacyRow) -> Result<NameDetail, DecodeError> {
    Ok(NameDetail::Local {
        name: row.name.trim().to_string(),
        area: UNKNOWN_AREA.to_string(),
    })
}

fn company_name(row: &RawLegacyRow) -> Result<NameDetail, DecodeError> {
    Ok(NameDetail::Company {
        name: row.name.trim().to_string(),
    })
}

fn other_name(row: &RawLegacyRow) -> Result<NameDetail, DecodeError> {
    Ok(NameDetail::Other {
        text: row.name.trim().to_string(),
    })
}

// The complex-name number sits in hex at characters 2..8 of the reversed name
fn complex_name(row: &RawLegacyRow) -> Result<NameDetail, DecodeError> {
    let digits: String = row.reverse_name.chars().skip(2).take(6).collect();
    if digits.chars().count() != 6 {
        return Err(DecodeError::MalformedDiscriminator {
            value: row.reverse_name.clone(),
            reason: "complex name number is shorter than six hex digits".to_string(),
        });
    }
    let number = u32::from_str_radix(&digits, 16).map_err(|_| DecodeError::MalformedDiscriminator {
        value: row.reverse_name.clone(),
        reason: format!("complex name number '{}' is not hex", digits),
    })?;

    Ok(NameDetail::Complex {
        name: row.name.trim().to_string(),
        number,
    })
}
