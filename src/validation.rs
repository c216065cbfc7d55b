//! Field-level validation shared by the JSON service and the MVC forms.
//!
//! Entity shapes derive [`validator::Validate`]; [`check`] flattens the derive
//! output into an ordered [`FieldErrors`] list so both surfaces can report the
//! same messages.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

/// Customer identifiers are exactly five uppercase ASCII letters, e.g. `ALFKI`.
pub static CUSTOMER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{5}$").expect("customer id pattern compiles"));

/// A single failed constraint on a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ordered collection of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages recorded against `field`, in insertion order.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut collected: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| default_message(field, &err.code));
                    FieldError::new(field, message)
                })
            })
            .collect();
        // HashMap iteration order is unspecified; sort so output is stable per field.
        collected.sort_by(|a, b| a.field.cmp(&b.field));
        FieldErrors(collected)
    }
}

fn default_message(field: &str, code: &Cow<'static, str>) -> String {
    match code.as_ref() {
        "length" => format!("{} has an invalid length", field),
        "range" => format!("{} is out of range", field),
        "email" => format!("{} is not a valid e-mail address", field),
        "url" => format!("{} is not a valid URL", field),
        _ => format!("{} is invalid", field),
    }
}

/// Runs the derived constraints of `value`.
pub fn check<T: Validate>(value: &T) -> Result<(), FieldErrors> {
    value.validate().map_err(FieldErrors::from)
}

/// Rejects empty and whitespace-only text.
pub fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required".into());
        return Err(err);
    }
    Ok(())
}

pub fn non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("Value must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Deserializes `""` (what an empty HTML input posts) as `None`.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Parses an optional form value, recording a field error when it is not a `T`.
pub fn parse_form_value<T: FromStr>(
    field: &str,
    label: &str,
    raw: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, format!("The value '{}' is not valid for {}.", raw, label));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(max = 3, message = "too long"))]
        name: String,
        #[validate(custom = "required_text")]
        title: String,
    }

    #[test]
    fn customer_id_pattern_is_anchored() {
        assert!(CUSTOMER_ID_PATTERN.is_match("ALFKI"));
        assert!(!CUSTOMER_ID_PATTERN.is_match("alfki"));
        assert!(!CUSTOMER_ID_PATTERN.is_match("ALFKIX"));
        assert!(!CUSTOMER_ID_PATTERN.is_match("XALFKI1"));
        assert!(!CUSTOMER_ID_PATTERN.is_match("ALF"));
    }

    #[test]
    fn check_flattens_errors_sorted_by_field() {
        let sample = Sample {
            name: "toolong".into(),
            title: "   ".into(),
        };
        let errors = check(&sample).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "title"]);
        assert_eq!(errors.for_field("name").collect::<Vec<_>>(), vec!["too long"]);
        assert_eq!(
            errors.for_field("title").collect::<Vec<_>>(),
            vec!["This field is required"]
        );
    }

    #[test]
    fn parse_form_value_records_unparseable_input() {
        let mut errors = FieldErrors::new();
        let price: Option<Decimal> = parse_form_value("unit_price", "Unit Price", "abc", &mut errors);
        assert!(price.is_none());
        assert!(errors.contains_field("unit_price"));

        let empty: Option<i16> = parse_form_value("units_in_stock", "Units In Stock", "  ", &mut errors);
        assert!(empty.is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = FieldErrors::new();
        errors.push("a", "first");
        errors.push("b", "second");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }

    #[test]
    fn negative_decimal_is_rejected() {
        assert!(non_negative_decimal(&Decimal::new(-1, 2)).is_err());
        assert!(non_negative_decimal(&Decimal::ZERO).is_ok());
        assert!(non_negative_decimal(&Decimal::new(1800, 2)).is_ok());
    }
}
