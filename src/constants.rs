/// Class-of-charge codes and the fixed strings shared across the migrator.

// Legacy (bracket-free) class codes paired with their bracketed register form
const CLASS_FORMS: &[(&str, &str)] = &[
    ("C1", "C(I)"),
    ("C2", "C(II)"),
    ("C3", "C(III)"),
    ("C4", "C(IV)"),
    ("D1", "D(I)"),
    ("D2", "D(II)"),
    ("D3", "D(III)"),
    ("PAB", "PA(B)"),
    ("WOB", "WO(B)"),
];

/// Bankruptcy classes whose owner is recorded as a debtor
pub const DEBTOR_CLASSES: &[&str] = &["PAB", "WOB"];

/// Classes where a "BANKS" county moves to migration data instead of particulars
pub const BANKRUPTCY_COUNTY_CLASSES: &[&str] = &["PA", "WO", "DA"];

pub const BANKS_COUNTY: &str = "BANKS";
pub const NO_COUNTY_SENTINELS: &[&str] = &["BANKS", "NO COUNTY", "NO COUNTIES"];

/// Application type of a new registration
pub const NEW_REGISTRATION_TYPE: &str = "NR";

pub const ADDRESS_DELIMITER: &str = "   ";

/// Area placeholder for local authority names; the legacy rows never carry one
pub const UNKNOWN_AREA: &str = "?????";

pub const DEFAULT_BATCH_SIZE: usize = 20;

// Flags attached to migration data for manual review
pub const FLAG_NOT_STARTING_WITH_NR: &str = "Does not start with NR";
pub const FLAG_NR_NOT_FIRST: &str = "NR is not the first item";
pub const FLAG_LAST_ITEM_NAMELESS: &str = "Last item lacks name information";
pub const FLAG_NO_SOURCE_IMAGERY: &str = "No legacy row data; registration lacks source imagery";

/// Convert a legacy class code to its bracketed form, e.g. `PAB` to `PA(B)`
pub fn convert_class(class_of_charge: &str) -> String {
    let class_of_charge = class_of_charge.trim();
    CLASS_FORMS
        .iter()
        .find(|(plain, _)| *plain == class_of_charge)
        .map(|(_, bracketed)| bracketed.to_string())
        .unwrap_or_else(|| class_of_charge.to_string())
}

/// Convert a bracketed class to the legacy code, e.g. `WO(B)` to `WOB`
pub fn class_without_brackets(class_of_charge: &str) -> String {
    let class_of_charge = class_of_charge.trim();
    CLASS_FORMS
        .iter()
        .find(|(_, bracketed)| *bracketed == class_of_charge)
        .map(|(plain, _)| plain.to_string())
        .unwrap_or_else(|| class_of_charge.to_string())
}

pub fn is_debtor_class(class_of_charge: &str) -> bool {
    DEBTOR_CLASSES.contains(&class_without_brackets(class_of_charge).as_str())
}

pub fn is_no_county(county: &str) -> bool {
    NO_COUNTY_SENTINELS.contains(&county.trim())
}
