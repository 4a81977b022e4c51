use chrono::NaiveDate;
use std::sync::Arc;

use super::text::TextRules;
use super::DecodeError;
use crate::constants::{
    class_without_brackets, is_debtor_class, is_no_county, ADDRESS_DELIMITER, BANKRUPTCY_COUNTY_CLASSES,
    BANKS_COUNTY,
};
use crate::domain::{
    Address, Applicant, LegacyExtra, MigrationData, NameDetail, NameType, NormalizedRegistration, Particulars,
    Party, PartyName, PartyType, RawLegacyRow, RegistrationKey,
};

/// Strip everything but digits from a registration number
pub fn canonicalize_registration_number(reg_no: &str) -> String {
    reg_no.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Split a legacy address on the triple-space line delimiter
pub fn split_addresses(address: &str) -> Vec<Address> {
    address
        .split(ADDRESS_DELIMITER)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Address { text: line.to_string() })
        .collect()
}

pub fn parse_legacy_date(date: &str) -> Result<NaiveDate, DecodeError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| DecodeError::InvalidDate {
        value: date.to_string(),
    })
}

/// Maps a single raw legacy row onto the register shape
#[derive(Clone)]
pub struct RegistrationBuilder {
    rules: Arc<dyn TextRules>,
}

impl RegistrationBuilder {
    pub fn new(rules: Arc<dyn TextRules>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &dyn TextRules {
        self.rules.as_ref()
    }

    pub fn build(
        &self,
        row: &RawLegacyRow,
        name: PartyName,
        entry_type: &str,
    ) -> Result<NormalizedRegistration, DecodeError> {
        let class_of_charge = class_without_brackets(&row.class_type);
        let date = parse_legacy_date(&row.registration_date)?;
        let amendment = self.rules.parse_amendment_info(&row.amendment_info);

        let mut migration_data = MigrationData {
            unconverted_reg_no: row.registration_no.clone(),
            extra: Some(LegacyExtra {
                occupation: row.occupation.clone(),
                counties: row.counties.clone(),
                property: row.property.clone(),
                parish_district: row.parish_district.clone(),
                priority_notice: row.priority_notice.clone(),
                priority_notice_ref: row.priority_notice_ref.clone(),
            }),
            ..Default::default()
        };

        let mut parties = Vec::new();
        let particulars = if is_debtor_class(&class_of_charge) {
            let mut debtor = Party::new(PartyType::Debtor, vec![name]);
            debtor.occupation = Some(row.occupation.trim().to_string());
            debtor.trading_name = Some(String::new());
            debtor.residence_withheld = Some(false);
            debtor.case_reference = amendment.reference.clone();
            debtor.addresses = split_addresses(&row.address);
            parties.push(debtor);

            if let Some(court) = &amendment.court {
                parties.push(Party::new(
                    PartyType::Court,
                    vec![PartyName {
                        name_type: NameType::Other,
                        detail: NameDetail::Other { text: court.clone() },
                    }],
                ));
            }
            None
        } else {
            let mut owner = Party::new(PartyType::EstateOwner, vec![name]);
            if !row.address.trim().is_empty() {
                owner.addresses = split_addresses(&row.address);
            }
            parties.push(owner);

            let county = row.counties.trim();
            let mut counties = Vec::new();
            if county == BANKS_COUNTY {
                if BANKRUPTCY_COUNTY_CLASSES.contains(&class_of_charge.as_str())
                    && !row.property_county.trim().is_empty()
                {
                    migration_data.bankruptcy_county = Some(self.rules.reformat_county(&row.property_county));
                }
            } else if !county.is_empty() && !is_no_county(county) {
                counties.push(self.rules.reformat_county(county));
            }

            Some(Particulars {
                counties,
                district: row.parish_district.trim().to_string(),
                description: row.property.trim().to_string(),
            })
        };

        Ok(NormalizedRegistration {
            class_of_charge,
            registration: RegistrationKey {
                registration_no: canonicalize_registration_number(&row.registration_no),
                date,
            },
            entry_type: entry_type.to_string(),
            parties,
            applicant: Applicant {
                reference: row.amendment_info.trim().to_string(),
                ..Default::default()
            },
            particulars,
            additional_information: amendment.additional_information,
            migration_data,
        })
    }
}
