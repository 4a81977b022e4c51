use serde::{Deserialize, Deserializer, Serialize};

/// One legacy index entry exactly as the legacy service returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLegacyRow {
    pub class_type: String,
    pub registration_no: String,
    pub registration_date: String,
    /// Hex rendering of the reversed name; the last byte is the owner discriminator
    pub reverse_name_hex: String,
    pub reverse_name: String,
    pub remainder_name: String,
    pub punctuation_code: String,
    /// Plain name used by non-private owners
    pub name: String,
    pub address: String,
    pub occupation: String,
    pub counties: String,
    #[serde(deserialize_with = "string_or_number")]
    pub property_county: String,
    pub parish_district: String,
    pub property: String,
    pub amendment_info: String,
    pub priority_notice: String,
    pub priority_notice_ref: String,
}

/// A chain head from the day index: a new registration touched on that day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainHead {
    #[serde(rename = "class")]
    pub class_of_charge: String,
    pub reg_no: String,
    pub date: String,
}

impl ChainHead {
    pub fn trimmed(self) -> Self {
        Self {
            class_of_charge: self.class_of_charge.trim().to_string(),
            reg_no: self.reg_no.trim().to_string(),
            date: self.date.trim().to_string(),
        }
    }
}

/// One link in a registration's chronological chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "class")]
    pub class_of_charge: String,
    pub reg_no: String,
    pub date: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub orig_number: Option<String>,
    #[serde(default)]
    pub orig_date: Option<String>,
    #[serde(default)]
    pub orig_class: Option<String>,
    /// Present only when legacy image data exists for the entry
    #[serde(default)]
    pub rows: Option<Vec<RawLegacyRow>>,
}

impl HistoryEntry {
    pub fn has_rows(&self) -> bool {
        self.rows.as_ref().map_or(false, |rows| !rows.is_empty())
    }
}

/// All history for one registration lineage, as fetched for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyChain {
    pub head: ChainHead,
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}

// The legacy feed sends some text columns as bare numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_row_accepts_numeric_property_county() {
        let row: RawLegacyRow = serde_json::from_value(json!({
            "registration_no": "1234",
            "class_type": "PA(B)",
            "property_county": 255,
            "reverse_name": "YDRUPYDDERFD"
        }))
        .unwrap();

        assert_eq!(row.property_county, "255");
        assert_eq!(row.remainder_name, "");
        assert_eq!(row.reverse_name, "YDRUPYDDERFD");
    }

    #[test]
    fn test_history_entry_without_rows() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "class": "C1",
            "reg_no": "100",
            "date": "2001-02-03",
            "type": "NR",
            "orig_number": null
        }))
        .unwrap();

        assert!(!entry.has_rows());
        assert_eq!(entry.entry_type, "NR");
        assert_eq!(entry.orig_number, None);
    }

    #[test]
    fn test_chain_head_trimmed() {
        let head = ChainHead {
            class_of_charge: " PAB ".to_string(),
            reg_no: "12 ".to_string(),
            date: " 2015-07-17".to_string(),
        }
        .trimmed();

        assert_eq!(head.class_of_charge, "PAB");
        assert_eq!(head.reg_no, "12");
        assert_eq!(head.date, "2015-07-17");
    }
}
