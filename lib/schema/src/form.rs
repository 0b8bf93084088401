//! Raw form input
//!
//! A [`RawForm`] is the named bundle of values a form collector hands over:
//! numbers, labels, yes/no flags, or nothing at all. No value is rejected
//! here; interpretation happens field by field in the encoder.

use ahash::AHashMap;
use loanscore_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw field value as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Flag(bool),
    Text(String),
    Blank,
    /// Arrays, objects and anything else a collector should not send
    Other(Value),
}

impl FormValue {
    /// True for `null`, for empty or whitespace-only text and for values of
    /// an unsupported JSON shape
    pub fn is_blank(&self) -> bool {
        match self {
            FormValue::Blank | FormValue::Other(_) => true,
            FormValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) if n.is_finite() => Some(*n),
            FormValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            FormValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::Number(n)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Flag(b)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

/// Named bundle of raw field values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawForm {
    fields: AHashMap<String, FormValue>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object; any other JSON shape is rejected
    pub fn from_json(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidInput {
                field: "<form>".to_string(),
                message: "form must be a JSON object".to_string(),
            });
        }
        serde_json::from_value(value).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<FormValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<FormValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Value for `name`; missing fields read as [`FormValue::Blank`]
    pub fn get(&self, name: &str) -> &FormValue {
        static BLANK: FormValue = FormValue::Blank;
        self.fields.get(name).unwrap_or(&BLANK)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_mixed_values() {
        let form: RawForm = serde_json::from_value(json!({
            "Client_Income": 50000,
            "Car_Owned": 1,
            "House_Own": true,
            "Client_Gender": "Male",
            "Client_Education": "",
            "Loan_Contract_Type": null
        }))
        .unwrap();

        assert_eq!(form.len(), 6);
        assert_eq!(form.get("Client_Income"), &FormValue::Number(50000.0));
        assert_eq!(form.get("House_Own"), &FormValue::Flag(true));
        assert_eq!(form.get("Client_Gender").as_label(), Some("Male"));
        assert!(form.get("Client_Education").is_blank());
        assert!(form.get("Loan_Contract_Type").is_blank());
        assert!(form.get("Not_A_Field").is_blank());
    }

    #[test]
    fn test_unsupported_shapes_read_as_blank() {
        let form = RawForm::from_json(json!({
            "Client_Gender": ["Male"],
            "Client_Income": { "amount": 50000 }
        }))
        .unwrap();

        let gender = form.get("Client_Gender");
        assert!(matches!(gender, FormValue::Other(_)));
        assert!(gender.is_blank());
        assert_eq!(gender.as_label(), None);
        assert_eq!(form.get("Client_Income").as_number(), None);
    }

    #[test]
    fn test_numeric_readings() {
        assert_eq!(FormValue::from(12.5).as_number(), Some(12.5));
        assert_eq!(FormValue::from(" 3 ").as_number(), Some(3.0));
        assert_eq!(FormValue::from(true).as_number(), Some(1.0));
        assert_eq!(FormValue::from("three").as_number(), None);
        assert_eq!(FormValue::Blank.as_number(), None);
        assert_eq!(FormValue::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_from_json_requires_object() {
        assert!(RawForm::from_json(json!({"Age_Years": 30})).is_ok());
        assert!(matches!(
            RawForm::from_json(json!([1, 2, 3])),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_builder() {
        let form = RawForm::new()
            .with("Age_Years", 35.0)
            .with("Client_Gender", "Female");
        assert!(form.contains("Age_Years"));
        assert_eq!(form.get("Age_Years").as_number(), Some(35.0));
    }
}
