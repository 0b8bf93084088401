//! Feature encoder
//!
//! Turns a raw form into the ordered vector a schema's classifier expects.
//! Encoding never fails: blank or unknown categorical values fall back to
//! the table sentinels and missing numbers fall back to field defaults.

use crate::explain::ExplainedVector;
use crate::form::RawForm;
use crate::schema::{Encoding, FeatureSchema, FieldSpec};
use loanscore_core::{FeatureMatrix, FeatureVector};

/// Stateless encoder bound to one schema
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
}

impl FeatureEncoder {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Vector dimension, fixed by the schema
    pub fn vector_dim(&self) -> usize {
        self.schema.dim()
    }

    /// Encode a form into a vector in schema slot order
    pub fn encode(&self, form: &RawForm) -> FeatureVector {
        let mut components: Vec<f64> = Vec::with_capacity(self.vector_dim());
        for field in self.schema.fields() {
            self.encode_field(form, field, &mut components);
        }
        FeatureVector::new(components)
    }

    /// Encode and reshape into a `1 x dim` batch
    pub fn encode_matrix(&self, form: &RawForm) -> FeatureMatrix {
        self.encode(form).into_matrix()
    }

    /// Encode and pair every slot with its name
    pub fn explain(&self, form: &RawForm) -> ExplainedVector {
        ExplainedVector::new(&self.schema.slot_names(), &self.encode(form))
    }

    fn encode_field(&self, form: &RawForm, field: &FieldSpec, out: &mut Vec<f64>) {
        let value = form.get(field.name);
        match &field.encoding {
            Encoding::Numeric { default, .. } => {
                out.push(value.as_number().unwrap_or(*default));
            }
            Encoding::Ordinal { table, .. } => {
                out.push(table.encode_ordinal(value));
            }
            Encoding::OneHot { table, .. } => {
                out.extend(table.encode_one_hot(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{ONE_HOT_SENTINEL, ORDINAL_SENTINEL};
    use crate::schema::{schema_a, schema_b};
    use serde_json::json;

    fn applicant_a() -> RawForm {
        RawForm::new()
            .with("Client_Income", 50000.0)
            .with("Car_Owned", 1.0)
            .with("Bike_Owned", 0.0)
            .with("Active_Loan", 0.0)
            .with("House_Own", 1.0)
            .with("Child_Count", 0.0)
            .with("Credit_Amount", 200000.0)
            .with("Loan_Annuity", 12000.0)
            .with("Client_Education", "Secondary")
            .with("Client_Income_Type", "Service")
            .with("Client_Marital_Status", "M")
            .with("Client_Gender", "Male")
            .with("Loan_Contract_Type", "RL")
            .with("Workphone_Working", 1.0)
            .with("Client_Family_Members", 3.0)
            .with("Age_Years", 35.0)
            .with("Employed_Years", 10.0)
    }

    #[test]
    fn test_schema_a_reference_vector() {
        let encoder = FeatureEncoder::new(schema_a());
        let vector = encoder.encode(&applicant_a());

        let expected = vec![
            50000.0, 1.0, 0.0, 0.0, 1.0, 0.0, 200000.0, 12000.0, 1.0, 3.0, 35.0, 10.0, 4.0, 0.0,
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0,
        ];
        assert_eq!(vector.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_yes_no_labels_match_codes() {
        let encoder = FeatureEncoder::new(schema_a());
        let labelled = applicant_a()
            .with("Car_Owned", "Yes")
            .with("Bike_Owned", "No")
            .with("House_Own", true);
        assert_eq!(encoder.encode(&labelled), encoder.encode(&applicant_a()));
    }

    #[test]
    fn test_schema_a_blank_form() {
        let encoder = FeatureEncoder::new(schema_a());
        let vector = encoder.encode(&RawForm::new());
        assert_eq!(vector.dim(), 27);

        // yes/no codes and education are label-coded, one-hot groups are all zero
        for i in [1, 2, 3, 4, 8, 12] {
            assert_eq!(vector[i], ORDINAL_SENTINEL, "slot {}", i);
        }
        assert!(vector.as_slice()[13..].iter().all(|v| *v == ONE_HOT_SENTINEL));
        for i in [0, 5, 6, 7, 9, 10, 11] {
            assert_eq!(vector[i], 0.0, "slot {}", i);
        }
    }

    #[test]
    fn test_schema_b_blank_form() {
        let encoder = FeatureEncoder::new(schema_b());
        let form = RawForm::from_json(json!({
            "Client_Income": 25000,
            "Age_Years": 41,
            "Client_Education": "",
            "Client_Income_Type": "",
            "Client_Marital_Status": "",
            "Client_Gender": "",
            "Loan_Contract_Type": "",
            "Car_Owned": "",
            "Bike_Owned": "",
            "Active_Loan": "",
            "House_Own": "",
            "Client_Permanent_Match_Tag": "",
            "Client_Contact_Work_Tag": ""
        }))
        .unwrap();

        let vector = encoder.encode(&form);
        assert_eq!(vector.dim(), 20);

        let schema = encoder.schema();
        let mut offset = 0;
        for field in schema.fields() {
            if field.is_numeric() {
                let expected = form.get(field.name).as_number().unwrap_or(0.0);
                assert_eq!(vector[offset], expected, "{}", field.name);
            } else {
                assert_eq!(vector[offset], -1.0, "{}", field.name);
            }
            offset += field.width();
        }
        assert_eq!(vector[0], 25000.0);
        assert_eq!(vector[8], 41.0);
    }

    #[test]
    fn test_dimension_is_invariant() {
        let forms = [
            RawForm::new(),
            applicant_a(),
            RawForm::new()
                .with("Client_Gender", "Other")
                .with("Client_Income_Type", 3.0)
                .with("Client_Income", "not a number"),
        ];
        for schema in [schema_a(), schema_b()] {
            let encoder = FeatureEncoder::new(schema);
            for form in &forms {
                assert_eq!(encoder.encode(form).dim(), encoder.vector_dim());
            }
        }
    }

    #[test]
    fn test_one_hot_groups_sum_to_at_most_one() {
        let encoder = FeatureEncoder::new(schema_a());
        let groups = [(13..19), (19..23), (23..25), (25..27)];
        for form in [RawForm::new(), applicant_a()] {
            let vector = encoder.encode(&form);
            for group in groups.clone() {
                let sum: f64 = vector.as_slice()[group].iter().sum();
                assert!(sum == 0.0 || sum == 1.0);
            }
        }
    }

    #[test]
    fn test_encoder_does_not_revalidate_numbers() {
        let encoder = FeatureEncoder::new(schema_b());
        let vector = encoder.encode(&RawForm::new().with("Child_Count", -2.0));
        assert_eq!(vector[1], -2.0);
    }

    #[test]
    fn test_encode_matrix_is_single_row() {
        let encoder = FeatureEncoder::new(schema_a());
        let matrix = encoder.encode_matrix(&applicant_a());
        assert_eq!(matrix.shape(), (1, 27));
    }

    #[test]
    fn test_explain_pairs_slots() {
        let encoder = FeatureEncoder::new(schema_a());
        let explained = encoder.explain(&applicant_a());
        assert_eq!(explained.slots.len(), 27);
        assert_eq!(explained.slots[12].name, "Education_Code");
        assert_eq!(explained.slots[12].value, 4.0);
    }
}
