use tracing::debug;

use super::estate_owner::EstateOwnerClassifier;
use super::registration::RegistrationBuilder;
use super::DecodeError;
use crate::constants::is_no_county;
use crate::domain::{NormalizedRegistration, RawLegacyRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTransform {
    Verbatim,
    County,
}

/// A legacy column whose divergent values are kept under `additional_rows`
pub struct ReconciledField {
    pub key: &'static str,
    pub value: fn(&RawLegacyRow) -> &str,
    pub transform: FieldTransform,
}

pub const RECONCILED_FIELDS: &[ReconciledField] = &[
    ReconciledField { key: "amendment_info", value: |r| &r.amendment_info, transform: FieldTransform::Verbatim },
    ReconciledField { key: "priority_notice", value: |r| &r.priority_notice, transform: FieldTransform::Verbatim },
    ReconciledField {
        key: "priority_notice_ref",
        value: |r| &r.priority_notice_ref,
        transform: FieldTransform::Verbatim,
    },
    ReconciledField { key: "parish_district", value: |r| &r.parish_district, transform: FieldTransform::Verbatim },
    ReconciledField { key: "address", value: |r| &r.address, transform: FieldTransform::Verbatim },
    ReconciledField { key: "property", value: |r| &r.property, transform: FieldTransform::Verbatim },
    ReconciledField { key: "name", value: |r| &r.name, transform: FieldTransform::Verbatim },
    ReconciledField { key: "occupation", value: |r| &r.occupation, transform: FieldTransform::Verbatim },
    ReconciledField { key: "counties", value: |r| &r.counties, transform: FieldTransform::County },
];

fn name_encoding_differs(a: &RawLegacyRow, b: &RawLegacyRow) -> bool {
    a.reverse_name != b.reverse_name || a.remainder_name != b.remainder_name || a.punctuation_code != b.punctuation_code
}

/// Folds secondary legacy rows into the registration built from the first row
pub struct VariantReconciler<'a> {
    classifier: &'a EstateOwnerClassifier,
    builder: &'a RegistrationBuilder,
}

impl<'a> VariantReconciler<'a> {
    pub fn new(classifier: &'a EstateOwnerClassifier, builder: &'a RegistrationBuilder) -> Self {
        Self { classifier, builder }
    }

    /// Diff rows 2..N against row 1. Returns registrations that stand apart from
    /// the primary, in row order; everything else is merged into `primary`.
    pub fn reconcile(
        &self,
        rows: &[RawLegacyRow],
        primary: &mut NormalizedRegistration,
        entry_type: &str,
    ) -> Result<Vec<NormalizedRegistration>, DecodeError> {
        let Some((first, rest)) = rows.split_first() else {
            return Ok(Vec::new());
        };

        let mut separate = Vec::new();
        for row in rest {
            if row.class_type != first.class_type {
                debug!("Row class {} differs from {}; building separate registration", row.class_type, first.class_type);
                let name = self.classifier.classify(row)?;
                separate.push(self.builder.build(row, name, entry_type)?);
                continue;
            }

            for field in RECONCILED_FIELDS {
                let value = (field.value)(row);
                if value == (field.value)(first) {
                    continue;
                }
                let value = match field.transform {
                    FieldTransform::Verbatim => value.to_string(),
                    FieldTransform::County => self.builder.rules().reformat_county(value),
                };
                primary
                    .migration_data
                    .additional_rows
                    .entry(field.key.to_string())
                    .or_default()
                    .push(value);
            }

            if name_encoding_differs(row, first) {
                let name = self.classifier.classify(row)?;
                if let Some(party) = primary.parties.first_mut() {
                    party.names.push(name);
                }
            }

            if row.property_county != first.property_county {
                if let Some(particulars) = primary.particulars.as_mut() {
                    let county = row.property_county.trim();
                    if !county.is_empty() && !is_no_county(county) {
                        let county = self.builder.rules().reformat_county(county);
                        if !particulars.counties.contains(&county) {
                            particulars.counties.push(county);
                        }
                    }
                }
            }
        }

        Ok(separate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NameDetail, NameType};
    use crate::transform::name_decoder::NameDecoder;
    use crate::transform::text::DefaultTextRules;
    use std::sync::Arc;

    struct Fixture {
        classifier: EstateOwnerClassifier,
        builder: RegistrationBuilder,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                classifier: EstateOwnerClassifier::new(NameDecoder::default(), &["16".to_string()]),
                builder: RegistrationBuilder::new(Arc::new(DefaultTextRules)),
            }
        }

        fn run(&self, rows: &[RawLegacyRow]) -> (NormalizedRegistration, Vec<NormalizedRegistration>) {
            let name = self.classifier.classify(&rows[0]).unwrap();
            let mut primary = self.builder.build(&rows[0], name, "NR").unwrap();
            let separate = VariantReconciler::new(&self.classifier, &self.builder)
                .reconcile(rows, &mut primary, "NR")
                .unwrap();
            (primary, separate)
        }
    }

    fn row() -> RawLegacyRow {
        RawLegacyRow {
            class_type: "C1".to_string(),
            registration_no: "500".to_string(),
            registration_date: "1990-01-02".to_string(),
            remainder_name: "JOHN".to_string(),
            reverse_name: "HTIMS".to_string(),
            punctuation_code: "24".to_string(),
            address: "1 MILL LANE   YORK".to_string(),
            counties: "NORTH YORKSHIRE".to_string(),
            property_county: "NORTH YORKSHIRE".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_address_difference_is_recorded_not_split() {
        let first = row();
        let mut second = row();
        second.address = "2 MILL LANE   YORK".to_string();

        let (primary, separate) = Fixture::new().run(&[first, second.clone()]);

        assert!(separate.is_empty());
        assert_eq!(primary.migration_data.additional_rows.len(), 1);
        assert_eq!(primary.migration_data.additional_rows["address"], vec![second.address]);
    }

    #[test]
    fn test_class_difference_builds_separate_registration() {
        let first = row();
        let mut second = row();
        second.class_type = "D2".to_string();
        second.address = "SOMEWHERE ELSE".to_string();

        let (primary, separate) = Fixture::new().run(&[first, second]);

        assert_eq!(separate.len(), 1);
        assert_eq!(separate[0].class_of_charge, "D2");
        assert!(primary.migration_data.additional_rows.is_empty());
    }

    #[test]
    fn test_values_accumulate_in_row_order() {
        let first = row();
        let mut second = row();
        second.occupation = "BAKER".to_string();
        let mut third = row();
        third.occupation = "BUTCHER".to_string();
        third.counties = "WEST YORKSHIRE".to_string();

        let (primary, _) = Fixture::new().run(&[first, second, third]);

        assert_eq!(primary.migration_data.additional_rows["occupation"], vec!["BAKER", "BUTCHER"]);
        assert_eq!(primary.migration_data.additional_rows["counties"], vec!["West Yorkshire"]);
    }

    #[test]
    fn test_name_difference_appends_name() {
        let first = row();
        let mut second = row();
        second.remainder_name = "JANE".to_string();

        let (primary, separate) = Fixture::new().run(&[first, second]);

        assert!(separate.is_empty());
        let names = &primary.parties[0].names;
        assert_eq!(names.len(), 2);
        assert_eq!(names[1].name_type, NameType::PrivateIndividual);
        assert_eq!(
            names[1].detail,
            NameDetail::Private {
                forenames: vec!["JANE".to_string(), "SMITH".to_string()],
                surname: String::new()
            }
        );
    }

    #[test]
    fn test_property_county_merges_as_set() {
        let first = row();
        let mut second = row();
        second.property_county = "WEST YORKSHIRE".to_string();
        let mut third = row();
        third.property_county = "WEST YORKSHIRE".to_string();
        let mut fourth = row();
        fourth.property_county = "NO COUNTY".to_string();

        let (primary, _) = Fixture::new().run(&[first, second, third, fourth]);

        let counties = &primary.particulars.as_ref().unwrap().counties;
        assert_eq!(counties, &vec!["North Yorkshire".to_string(), "West Yorkshire".to_string()]);
    }

    #[test]
    fn test_single_row_is_untouched() {
        let (primary, separate) = Fixture::new().run(&[row()]);
        assert!(separate.is_empty());
        assert!(primary.migration_data.additional_rows.is_empty());
        assert_eq!(primary.parties[0].names.len(), 1);
    }
}
