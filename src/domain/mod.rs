// Domain data shapes shared across layers

pub mod legacy;
pub mod registration;

pub use legacy::{ChainHead, HistoryEntry, LegacyChain, RawLegacyRow};
pub use registration::{
    Address, Applicant, LegacyExtra, MigrationData, NameDetail, NameType, NormalizedRegistration,
    OriginalReference, Particulars, Party, PartyName, PartyType, RegistrationKey,
};
