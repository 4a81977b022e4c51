use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registration in the shape the target register expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRegistration {
    /// Bracket-free class code, e.g. `PAB`
    pub class_of_charge: String,
    pub registration: RegistrationKey,
    /// Application type from the history chain (`NR`, `AM`, `CN`, ...)
    #[serde(rename = "type")]
    pub entry_type: String,
    pub parties: Vec<Party>,
    pub applicant: Applicant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particulars: Option<Particulars>,
    pub additional_information: String,
    pub migration_data: MigrationData,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationKey {
    /// Digits only
    pub registration_no: String,
    pub date: NaiveDate,
}

impl std::fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.date, self.registration_no)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyType {
    Debtor,
    #[serde(rename = "Estate Owner")]
    EstateOwner,
    Court,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(rename = "type")]
    pub party_type: PartyType,
    pub names: Vec<PartyName>,
    pub addresses: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trading_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residence_withheld: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_reference: Option<String>,
}

impl Party {
    pub fn new(party_type: PartyType, names: Vec<PartyName>) -> Self {
        Self {
            party_type,
            names,
            addresses: Vec::new(),
            occupation: None,
            trading_name: None,
            residence_withheld: None,
            case_reference: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub text: String,
}

/// The legal-entity kind of a party's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameType {
    #[serde(rename = "County Council")]
    CountyCouncil,
    #[serde(rename = "Rural Council")]
    RuralCouncil,
    #[serde(rename = "Parish Council")]
    ParishCouncil,
    #[serde(rename = "Other Council")]
    OtherCouncil,
    #[serde(rename = "Development Corporation")]
    DevelopmentCorporation,
    #[serde(rename = "Limited Company")]
    LimitedCompany,
    Other,
    #[serde(rename = "Complex Name")]
    ComplexName,
    #[serde(rename = "Private Individual")]
    PrivateIndividual,
}

impl NameType {
    pub fn label(&self) -> &'static str {
        match self {
            NameType::CountyCouncil => "County Council",
            NameType::RuralCouncil => "Rural Council",
            NameType::ParishCouncil => "Parish Council",
            NameType::OtherCouncil => "Other Council",
            NameType::DevelopmentCorporation => "Development Corporation",
            NameType::LimitedCompany => "Limited Company",
            NameType::Other => "Other",
            NameType::ComplexName => "Complex Name",
            NameType::PrivateIndividual => "Private Individual",
        }
    }
}

/// A party name: exactly one populated shape, tagged with its entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyName {
    #[serde(rename = "type")]
    pub name_type: NameType,
    #[serde(flatten)]
    pub detail: NameDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum NameDetail {
    Local { name: String, area: String },
    Company { name: String },
    Other { text: String },
    Complex { name: String, number: u32 },
    Private { forenames: Vec<String>, surname: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub name: String,
    pub address: String,
    pub key_number: String,
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Particulars {
    pub counties: Vec<String>,
    pub district: String,
    pub description: String,
}

/// Where a registration came from and what needs a human to look at it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationData {
    pub unconverted_reg_no: String,
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<OriginalReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bankruptcy_county: Option<String>,
    /// Values from secondary legacy rows that disagree with the primary row
    pub additional_rows: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<LegacyExtra>,
}

impl MigrationData {
    pub fn add_flag(&mut self, flag: &str) {
        self.flags.push(flag.to_string());
    }
}

/// Pre-amendment reference carried by a history entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginalReference {
    pub registration_no: Option<String>,
    pub date: Option<String>,
    pub class: Option<String>,
}

/// Legacy columns with no home in the target schema, kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyExtra {
    pub occupation: String,
    pub counties: String,
    pub property: String,
    pub parish_district: String,
    pub priority_notice: String,
    pub priority_notice_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_party_name_serializes_single_shape() {
        let name = PartyName {
            name_type: NameType::CountyCouncil,
            detail: NameDetail::Local {
                name: "DEVON COUNTY COUNCIL".to_string(),
                area: "?????".to_string(),
            },
        };

        let value = serde_json::to_value(&name).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "County Council",
                "form": "local",
                "name": "DEVON COUNTY COUNCIL",
                "area": "?????"
            })
        );
    }

    #[test]
    fn test_party_type_wire_names() {
        assert_eq!(serde_json::to_value(PartyType::EstateOwner).unwrap(), json!("Estate Owner"));
        assert_eq!(serde_json::to_value(PartyType::Debtor).unwrap(), json!("Debtor"));
    }

    #[test]
    fn test_registration_key_display() {
        let key = RegistrationKey {
            registration_no: "1234".to_string(),
            date: NaiveDate::from_ymd_opt(2015, 7, 17).unwrap(),
        };
        assert_eq!(key.to_string(), "2015-07-17/1234");
    }
}
