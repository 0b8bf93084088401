//! Categorical lookup tables
//!
//! Every categorical field is a closed, ordered set of labels. The position
//! of a label is its integer code and also its flag position when the field
//! is one-hot expanded. Lookups are total: anything outside the set comes
//! back as `None` and the caller substitutes its sentinel.

use crate::form::FormValue;
use serde::Serialize;

/// Code written for an unrecognised or blank label-coded field
pub const ORDINAL_SENTINEL: f64 = -1.0;

/// Flag value written to every slot of an unselected one-hot group
pub const ONE_HOT_SENTINEL: f64 = 0.0;

/// A closed label set with fixed integer codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelTable {
    pub field: &'static str,
    pub labels: &'static [&'static str],
    /// Also accept the raw integer codes themselves (yes/no widgets submit 0/1)
    #[serde(skip)]
    pub accepts_codes: bool,
}

impl LabelTable {
    pub const fn new(field: &'static str, labels: &'static [&'static str]) -> Self {
        Self {
            field,
            labels,
            accepts_codes: false,
        }
    }

    pub const fn with_codes(field: &'static str, labels: &'static [&'static str]) -> Self {
        Self {
            field,
            labels,
            accepts_codes: true,
        }
    }

    /// Number of labels, which is also the one-hot group width
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Code of an exact label match
    pub fn code(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| *l == label)
    }

    /// Code for a raw form value, `None` when it is outside the table
    pub fn lookup(&self, value: &FormValue) -> Option<usize> {
        match value {
            FormValue::Text(s) => self.code(s).or_else(|| {
                if self.accepts_codes {
                    s.trim().parse::<usize>().ok().filter(|c| *c < self.len())
                } else {
                    None
                }
            }),
            FormValue::Number(n) if self.accepts_codes => {
                let code = *n as usize;
                (n.fract() == 0.0 && *n >= 0.0 && code < self.len()).then_some(code)
            }
            FormValue::Flag(b) if self.accepts_codes => {
                let code = usize::from(*b);
                (code < self.len()).then_some(code)
            }
            _ => None,
        }
    }

    /// Single label-encoded slot, [`ORDINAL_SENTINEL`] when unrecognised
    pub fn encode_ordinal(&self, value: &FormValue) -> f64 {
        self.lookup(value)
            .map(|code| code as f64)
            .unwrap_or(ORDINAL_SENTINEL)
    }

    /// One flag per label in table order; all [`ONE_HOT_SENTINEL`] when unrecognised
    pub fn encode_one_hot(&self, value: &FormValue) -> Vec<f64> {
        let mut flags = vec![ONE_HOT_SENTINEL; self.len()];
        if let Some(code) = self.lookup(value) {
            flags[code] = 1.0;
        }
        flags
    }
}

pub const EDUCATION: LabelTable = LabelTable::new(
    "Client_Education",
    &[
        "Graduation",
        "Graduation dropout",
        "Junior secondary",
        "Post Grad",
        "Secondary",
    ],
);

pub const INCOME_TYPE: LabelTable = LabelTable::new(
    "Client_Income_Type",
    &[
        "Commercial",
        "Govt Job",
        "Maternity leave",
        "Retired",
        "Service",
        "Student",
    ],
);

pub const MARITAL_STATUS: LabelTable =
    LabelTable::new("Client_Marital_Status", &["D", "M", "S", "W"]);

pub const GENDER: LabelTable = LabelTable::new("Client_Gender", &["Female", "Male"]);

pub const CONTRACT_TYPE: LabelTable = LabelTable::new("Loan_Contract_Type", &["CL", "RL"]);

pub const YES_NO: LabelTable = LabelTable::with_codes("Yes/No", &["No", "Yes"]);
