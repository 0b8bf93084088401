//! Feature schema definitions
//!
//! A schema is the ordered list of form fields a classifier was trained on,
//! together with how each field turns into one or more numeric slots. Slot
//! order is part of the trained model: reordering fields silently corrupts
//! every prediction, so the two layouts below are fixed.

use crate::form::RawForm;
use crate::lookup::{
    LabelTable, CONTRACT_TYPE, EDUCATION, GENDER, INCOME_TYPE, MARITAL_STATUS, YES_NO,
};
use loanscore_core::{Error, Result, SchemaVariant};
use std::collections::HashSet;

/// How a form field becomes numeric slots
#[derive(Debug, Clone, PartialEq)]
pub enum Encoding {
    /// Copied through unchanged; `default` fills a missing or non-numeric value
    Numeric { slot: &'static str, default: f64 },
    /// Single label-coded slot
    Ordinal {
        slot: &'static str,
        table: LabelTable,
    },
    /// One flag per label, in table order
    OneHot {
        slots: &'static [&'static str],
        table: LabelTable,
    },
}

/// A named form field and its encoding
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub encoding: Encoding,
}

impl FieldSpec {
    /// Numeric field whose widget starts at zero
    pub fn numeric(name: &'static str, slot: &'static str) -> Self {
        Self {
            name,
            encoding: Encoding::Numeric { slot, default: 0.0 },
        }
    }

    pub fn ordinal(name: &'static str, slot: &'static str, table: LabelTable) -> Self {
        Self {
            name,
            encoding: Encoding::Ordinal { slot, table },
        }
    }

    pub fn yes_no(name: &'static str, slot: &'static str) -> Self {
        Self::ordinal(name, slot, YES_NO)
    }

    pub fn one_hot(name: &'static str, slots: &'static [&'static str], table: LabelTable) -> Self {
        Self {
            name,
            encoding: Encoding::OneHot { slots, table },
        }
    }

    /// Number of slots this field occupies
    pub fn width(&self) -> usize {
        match &self.encoding {
            Encoding::Numeric { .. } | Encoding::Ordinal { .. } => 1,
            Encoding::OneHot { slots, .. } => slots.len(),
        }
    }

    pub fn slots(&self) -> Vec<&'static str> {
        match &self.encoding {
            Encoding::Numeric { slot, .. } | Encoding::Ordinal { slot, .. } => vec![*slot],
            Encoding::OneHot { slots, .. } => slots.to_vec(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.encoding, Encoding::Numeric { .. })
    }

    /// Closed label set, for categorical fields
    pub fn table(&self) -> Option<&LabelTable> {
        match &self.encoding {
            Encoding::Numeric { .. } => None,
            Encoding::Ordinal { table, .. } | Encoding::OneHot { table, .. } => Some(table),
        }
    }
}

/// Ordered field layout a classifier was trained against
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    variant: SchemaVariant,
    fields: Vec<FieldSpec>,
}

impl FeatureSchema {
    /// Build a schema, checking that field names and slot names are unique
    /// and that every one-hot group has one slot per label
    pub fn new(variant: SchemaVariant, fields: Vec<FieldSpec>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::InvalidConfig(format!("schema {} has no fields", variant)));
        }

        let mut names = HashSet::new();
        let mut slots = HashSet::new();
        for field in &fields {
            if !names.insert(field.name) {
                return Err(Error::InvalidConfig(format!(
                    "schema {} declares field '{}' twice",
                    variant, field.name
                )));
            }
            if let Encoding::OneHot { slots: group, table } = &field.encoding {
                if group.len() != table.len() {
                    return Err(Error::InvalidConfig(format!(
                        "field '{}' has {} one-hot slots for {} labels",
                        field.name,
                        group.len(),
                        table.len()
                    )));
                }
            }
            for slot in field.slots() {
                if !slots.insert(slot) {
                    return Err(Error::InvalidConfig(format!(
                        "schema {} declares slot '{}' twice",
                        variant, slot
                    )));
                }
            }
        }

        Ok(Self { variant, fields })
    }

    /// The fixed layout for `variant`
    pub fn for_variant(variant: SchemaVariant) -> Self {
        match variant {
            SchemaVariant::A => schema_a(),
            SchemaVariant::B => schema_b(),
        }
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Length of every vector this schema produces
    pub fn dim(&self) -> usize {
        self.fields.iter().map(FieldSpec::width).sum()
    }

    /// Slot names in vector order
    pub fn slot_names(&self) -> Vec<&'static str> {
        self.fields.iter().flat_map(FieldSpec::slots).collect()
    }

    /// Form-collector lower bound: numeric fields must not be negative.
    ///
    /// The encoder itself never calls this; it is the boundary's check.
    pub fn check_bounds(&self, form: &RawForm) -> Result<()> {
        for field in self.fields.iter().filter(|f| f.is_numeric()) {
            if let Some(n) = form.get(field.name).as_number() {
                if n < 0.0 {
                    return Err(Error::InvalidInput {
                        field: field.name.to_string(),
                        message: format!("must be >= 0, got {}", n),
                    });
                }
            }
        }
        Ok(())
    }
}

const INCOME_TYPE_FLAGS: &[&str] = &[
    "IncomeType_Commercial",
    "IncomeType_GovtJob",
    "IncomeType_MaternityLeave",
    "IncomeType_Retired",
    "IncomeType_Service",
    "IncomeType_Student",
];

const MARITAL_FLAGS: &[&str] = &["Marital_D", "Marital_M", "Marital_S", "Marital_W"];

const GENDER_FLAGS: &[&str] = &["Gender_Female", "Gender_Male"];

const CONTRACT_FLAGS: &[&str] = &["Contract_CL", "Contract_RL"];

fn schema_a_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::numeric("Client_Income", "Client_Income"),
        FieldSpec::yes_no("Car_Owned", "Car_Owned"),
        FieldSpec::yes_no("Bike_Owned", "Bike_Owned"),
        FieldSpec::yes_no("Active_Loan", "Active_Loan"),
        FieldSpec::yes_no("House_Own", "House_Own"),
        FieldSpec::numeric("Child_Count", "Child_Count"),
        FieldSpec::numeric("Credit_Amount", "Credit_Amount"),
        FieldSpec::numeric("Loan_Annuity", "Loan_Annuity"),
        FieldSpec::yes_no("Workphone_Working", "Workphone_Working"),
        FieldSpec::numeric("Client_Family_Members", "Client_Family_Members"),
        FieldSpec::numeric("Age_Years", "Age_Years"),
        FieldSpec::numeric("Employed_Years", "Employed_Years"),
        FieldSpec::ordinal("Client_Education", "Education_Code", EDUCATION),
        FieldSpec::one_hot("Client_Income_Type", INCOME_TYPE_FLAGS, INCOME_TYPE),
        FieldSpec::one_hot("Client_Marital_Status", MARITAL_FLAGS, MARITAL_STATUS),
        FieldSpec::one_hot("Client_Gender", GENDER_FLAGS, GENDER),
        FieldSpec::one_hot("Loan_Contract_Type", CONTRACT_FLAGS, CONTRACT_TYPE),
    ]
}

fn schema_b_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::numeric("Client_Income", "Client_Income"),
        FieldSpec::numeric("Child_Count", "Child_Count"),
        FieldSpec::numeric("Credit_Amount", "Credit_Amount"),
        FieldSpec::numeric("Loan_Annuity", "Loan_Annuity"),
        FieldSpec::numeric("Registration_Years", "Registration_years"),
        FieldSpec::numeric("Client_Family_Members", "Client_Family_Members"),
        FieldSpec::yes_no("Client_Permanent_Match_Tag", "Client_Permanent_Match_Tag"),
        FieldSpec::yes_no("Client_Contact_Work_Tag", "Client_Contact_Work_Tag"),
        FieldSpec::numeric("Age_Years", "Age_Years"),
        FieldSpec::numeric("Employed_Years", "Employed_Years"),
        FieldSpec::numeric("ID_Years", "ID_years"),
        FieldSpec::ordinal("Client_Education", "Education_Code", EDUCATION),
        FieldSpec::ordinal("Client_Income_Type", "IncomeType_Code", INCOME_TYPE),
        FieldSpec::ordinal("Client_Marital_Status", "Marital_Code", MARITAL_STATUS),
        FieldSpec::ordinal("Client_Gender", "Gender_Code", GENDER),
        FieldSpec::ordinal("Loan_Contract_Type", "Contract_Code", CONTRACT_TYPE),
        FieldSpec::yes_no("Car_Owned", "Car_Owned_Code"),
        FieldSpec::yes_no("Bike_Owned", "Bike_Owned_Code"),
        FieldSpec::yes_no("Active_Loan", "Active_Loan_Code"),
        FieldSpec::yes_no("House_Own", "House_Own_Code"),
    ]
}

/// One-hot layout: pass-through and yes/no slots, education code, then
/// income type, marital status, gender and contract type flag groups
pub fn schema_a() -> FeatureSchema {
    FeatureSchema {
        variant: SchemaVariant::A,
        fields: schema_a_fields(),
    }
}

/// Label-coded layout, one slot per field
pub fn schema_b() -> FeatureSchema {
    FeatureSchema {
        variant: SchemaVariant::B,
        fields: schema_b_fields(),
    }
}
