//! Legacy record transformation: turns one registration's raw history chain
//! into normalized registrations.
//!
//! Flow per chain: sort the history, then for each entry classify the owner
//! name, build the primary registration, reconcile variant rows, and finally
//! flag chain-shape oddities. Entries without legacy rows become placeholders.

pub mod chain;
pub mod estate_owner;
pub mod name_decoder;
pub mod reconcile;
pub mod registration;
pub mod text;

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::DecoderConfig;
use crate::domain::{LegacyChain, NormalizedRegistration, RawLegacyRow};

pub use chain::{dummy_registration, flag_oddities, sort_history};
pub use estate_owner::EstateOwnerClassifier;
pub use name_decoder::{DecodedName, NameDecoder, PunctuationScheme};
pub use reconcile::VariantReconciler;
pub use registration::{canonicalize_registration_number, RegistrationBuilder};
pub use text::{AmendmentInfo, DefaultTextRules, TextRules};

/// A raw row that cannot be decoded. Fatal to the chain it belongs to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("punctuation code '{code}' has an odd number of hex digits")]
    OddPunctuationLength { code: String },

    #[error("punctuation code '{code}' is not a hex pair")]
    InvalidPunctuationHex { code: String },

    #[error("punctuation code '{code}' selects symbol {index}, which is outside the table")]
    UnmappedPunctuation { code: String, index: usize },

    #[error("malformed discriminator in '{value}': {reason}")]
    MalformedDiscriminator { value: String, reason: String },

    #[error("invalid legacy date '{value}'")]
    InvalidDate { value: String },

    #[error("chain has no history entries")]
    EmptyChain,
}

pub struct TransformEngine {
    classifier: EstateOwnerClassifier,
    builder: RegistrationBuilder,
}

impl TransformEngine {
    pub fn new(config: &DecoderConfig, rules: Arc<dyn TextRules>) -> Self {
        let decoder = NameDecoder::new(config.punctuation_scheme);
        Self {
            classifier: EstateOwnerClassifier::new(decoder, &config.development_corporation_codes),
            builder: RegistrationBuilder::new(rules),
        }
    }

    /// Registrations described by the legacy rows of one history entry: the
    /// primary first, then any rows that turned out to be separate registrations
    pub fn extract(&self, rows: &[RawLegacyRow], entry_type: &str) -> Result<Vec<NormalizedRegistration>, DecodeError> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        let name = self.classifier.classify(first)?;
        let mut primary = self.builder.build(first, name, entry_type)?;
        let separate = VariantReconciler::new(&self.classifier, &self.builder).reconcile(rows, &mut primary, entry_type)?;

        let mut registrations = Vec::with_capacity(1 + separate.len());
        registrations.push(primary);
        registrations.extend(separate);
        Ok(registrations)
    }

    /// Transform a whole chain in date order and flag its oddities
    #[instrument(skip_all, fields(class = %chain.head.class_of_charge, reg_no = %chain.head.reg_no, date = %chain.head.date))]
    pub fn assemble_chain(&self, chain: &LegacyChain) -> Result<Vec<NormalizedRegistration>, DecodeError> {
        if chain.entries.is_empty() {
            return Err(DecodeError::EmptyChain);
        }

        let mut items = Vec::new();
        for entry in sort_history(&chain.entries)? {
            debug!(
                "Historical record {} {} {}",
                entry.class_of_charge, entry.reg_no, entry.date
            );
            if !entry.has_rows() {
                items.push(dummy_registration(entry)?);
                continue;
            }
            let rows = entry.rows.as_deref().unwrap_or_default();
            let original = chain::original_reference(entry);
            for mut registration in self.extract(rows, entry.entry_type.trim())? {
                registration.migration_data.original = Some(original.clone());
                items.push(registration);
            }
        }

        let raised = flag_oddities(&mut items);
        if !raised.is_empty() {
            info!(flags = ?raised, "Chain flagged for review");
        }
        Ok(items)
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new(&DecoderConfig::default(), Arc::new(DefaultTextRules))
    }
}
