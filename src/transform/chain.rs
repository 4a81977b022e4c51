use chrono::NaiveDate;

use super::registration::{canonicalize_registration_number, parse_legacy_date};
use super::DecodeError;
use crate::constants::{
    class_without_brackets, FLAG_LAST_ITEM_NAMELESS, FLAG_NOT_STARTING_WITH_NR, FLAG_NO_SOURCE_IMAGERY,
    FLAG_NR_NOT_FIRST, NEW_REGISTRATION_TYPE,
};
use crate::domain::{Applicant, HistoryEntry, MigrationData, NormalizedRegistration, OriginalReference, RegistrationKey};

/// Order a chain by date then registration number.
///
/// Numbers compare by magnitude on their digits, so arbitrarily long numbers
/// never overflow; the raw text breaks ties.
pub fn sort_history(entries: &[HistoryEntry]) -> Result<Vec<&HistoryEntry>, DecodeError> {
    let mut keyed: Vec<((NaiveDate, usize, String, &str), &HistoryEntry)> = entries
        .iter()
        .map(|entry| -> Result<_, DecodeError> {
            let date = parse_legacy_date(&entry.date)?;
            let digits = canonicalize_registration_number(&entry.reg_no);
            let digits = digits.trim_start_matches('0').to_string();
            Ok(((date, digits.len(), digits, entry.reg_no.trim()), entry))
        })
        .collect::<Result<_, DecodeError>>()?;

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, entry)| entry).collect())
}

pub fn original_reference(entry: &HistoryEntry) -> OriginalReference {
    OriginalReference {
        registration_no: entry.orig_number.clone(),
        date: entry.orig_date.clone(),
        class: entry.orig_class.clone(),
    }
}

/// Placeholder for a history entry with no legacy rows behind it
pub fn dummy_registration(entry: &HistoryEntry) -> Result<NormalizedRegistration, DecodeError> {
    Ok(NormalizedRegistration {
        class_of_charge: class_without_brackets(&entry.class_of_charge),
        registration: RegistrationKey {
            registration_no: canonicalize_registration_number(&entry.reg_no),
            date: parse_legacy_date(&entry.date)?,
        },
        entry_type: entry.entry_type.trim().to_string(),
        parties: Vec::new(),
        applicant: Applicant::default(),
        particulars: None,
        additional_information: String::new(),
        migration_data: MigrationData {
            unconverted_reg_no: entry.reg_no.clone(),
            flags: vec![FLAG_NO_SOURCE_IMAGERY.to_string()],
            original: Some(original_reference(entry)),
            ..Default::default()
        },
    })
}

/// Flag chain-shape problems on every item. Returns the flags raised.
pub fn flag_oddities(items: &mut [NormalizedRegistration]) -> Vec<&'static str> {
    let mut raised = Vec::new();
    let Some(first) = items.first() else {
        return raised;
    };

    if first.entry_type != NEW_REGISTRATION_TYPE {
        raised.push(FLAG_NOT_STARTING_WITH_NR);
    }
    if items.iter().skip(1).any(|item| item.entry_type == NEW_REGISTRATION_TYPE) {
        raised.push(FLAG_NR_NOT_FIRST);
    }
    if items.last().map_or(false, |last| last.parties.is_empty()) {
        raised.push(FLAG_LAST_ITEM_NAMELESS);
    }

    for item in items.iter_mut() {
        for flag in &raised {
            item.migration_data.add_flag(flag);
        }
    }
    raised
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(reg_no: &str, date: &str, entry_type: &str) -> HistoryEntry {
        HistoryEntry {
            class_of_charge: "PA(B)".to_string(),
            reg_no: reg_no.to_string(),
            date: date.to_string(),
            entry_type: entry_type.to_string(),
            orig_number: Some("100".to_string()),
            orig_date: Some("2001-01-01".to_string()),
            orig_class: Some("PA(B)".to_string()),
            rows: None,
        }
    }

    #[test]
    fn test_sort_by_date_then_number() {
        let entries = vec![
            entry("900", "2002-05-01", "AM"),
            entry("20", "2001-01-01", "CN"),
            entry("100", "2001-01-01", "NR"),
            entry("3", "2001-01-01", "RN"),
        ];

        let sorted = sort_history(&entries).unwrap();
        let numbers: Vec<&str> = sorted.iter().map(|e| e.reg_no.as_str()).collect();
        assert_eq!(numbers, vec!["3", "20", "100", "900"]);
    }

    #[test]
    fn test_sort_handles_numbers_past_u64() {
        let entries = vec![
            entry("123456789012345678901234567890", "2001-01-01", "AM"),
            entry("0042", "2001-01-01", "NR"),
            entry("99999999999999999999", "2001-01-01", "CN"),
        ];

        let sorted = sort_history(&entries).unwrap();
        let numbers: Vec<&str> = sorted.iter().map(|e| e.reg_no.as_str()).collect();
        assert_eq!(
            numbers,
            vec!["0042", "99999999999999999999", "123456789012345678901234567890"]
        );
    }

    #[test]
    fn test_sort_rejects_bad_date() {
        let entries = vec![entry("1", "not a date", "NR")];
        assert!(matches!(sort_history(&entries), Err(DecodeError::InvalidDate { .. })));
    }

    #[test]
    fn test_dummy_registration() {
        let dummy = dummy_registration(&entry("12/34", "2003-04-05", "NR")).unwrap();

        assert_eq!(dummy.class_of_charge, "PAB");
        assert_eq!(dummy.registration.registration_no, "1234");
        assert_eq!(dummy.migration_data.unconverted_reg_no, "12/34");
        assert!(dummy.parties.is_empty());
        assert!(dummy.particulars.is_none());
        assert_eq!(dummy.migration_data.flags, vec![FLAG_NO_SOURCE_IMAGERY]);
        assert_eq!(
            dummy.migration_data.original.unwrap().registration_no.as_deref(),
            Some("100")
        );
    }

    #[test]
    fn test_flags_on_every_item() {
        let mut items = vec![
            dummy_registration(&entry("1", "2001-01-01", "AM")).unwrap(),
            dummy_registration(&entry("2", "2001-01-02", "NR")).unwrap(),
        ];

        let raised = flag_oddities(&mut items);

        assert_eq!(raised, vec![FLAG_NOT_STARTING_WITH_NR, FLAG_NR_NOT_FIRST, FLAG_LAST_ITEM_NAMELESS]);
        for item in &items {
            assert!(item.migration_data.flags.contains(&FLAG_NOT_STARTING_WITH_NR.to_string()));
            assert!(item.migration_data.flags.contains(&FLAG_LAST_ITEM_NAMELESS.to_string()));
        }
    }

    #[test]
    fn test_empty_chain_raises_nothing() {
        let mut items: Vec<NormalizedRegistration> = Vec::new();
        assert!(flag_oddities(&mut items).is_empty());
    }
}
