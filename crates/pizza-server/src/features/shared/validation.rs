//! Shared validation utilities
//!
//! Request bodies are checked field by field and every problem is collected
//! into a [`FieldErrors`] map, so a single 400 response can report all of
//! them at once.
//!
//! # Examples
//!
//! ```rust,ignore
//! use pizza_server::features::shared::validation::{validate_name, FieldErrors};
//!
//! let mut errors = FieldErrors::default();
//! let name = validate_name(&object, "topping", &mut errors);
//! errors.into_result()?;
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum length of a topping or pizza name, in characters
pub const MAX_NAME_LENGTH: usize = 200;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const INVALID_VALUE: &str = "Invalid value.";

/// Field-keyed validation messages, serialized as `{"field": ["msg", ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Error map holding a single message
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when no message was recorded
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Message for a length violation
pub fn too_long(max_length: usize) -> String {
    format!("Ensure this field has no more than {} characters.", max_length)
}

/// Message for a body that is valid JSON but not an object
pub fn expected_object(value: &Value) -> String {
    format!(
        "Invalid data. Expected a dictionary, but got {}.",
        json_type_name(value)
    )
}

/// Message for a list field that received something else
pub fn expected_list(value: &Value) -> String {
    format!(
        "Expected a list of items but got type \"{}\".",
        json_type_name(value)
    )
}

/// Python-flavoured type name used in client-facing messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Validate a required name field
///
/// # Rules
/// - Must be present and not null
/// - Strings and numbers are accepted; numbers are used in their decimal form
/// - Surrounding whitespace is trimmed before the remaining checks
/// - Must not be blank after trimming
/// - Must not exceed [`MAX_NAME_LENGTH`] characters
///
/// Returns the cleaned name, or `None` after recording a message under `field`.
pub fn validate_name(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let raw = match object.get(field) {
        None => {
            errors.add(field, REQUIRED);
            return None;
        },
        Some(Value::Null) => {
            errors.add(field, NOT_NULL);
            return None;
        },
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add(field, NOT_A_STRING);
            return None;
        },
    };

    let name = raw.trim();
    if let Err(message) = check_name(name) {
        errors.add(field, message);
        return None;
    }

    Some(name.to_string())
}

/// Blank and length rules for an already extracted name
pub fn check_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(NOT_BLANK.to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(too_long(MAX_NAME_LENGTH));
    }
    Ok(())
}

/// Validate a required list of names
///
/// An empty list is valid. Items must be strings or numbers, numbers being
/// looked up by their decimal form; order is preserved and nothing is
/// deduplicated here.
pub fn validate_name_list(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<Vec<String>> {
    let items = match object.get(field) {
        None => {
            errors.add(field, REQUIRED);
            return None;
        },
        Some(Value::Null) => {
            errors.add(field, NOT_NULL);
            return None;
        },
        Some(Value::Array(items)) => items,
        Some(other) => {
            errors.add(field, expected_list(other));
            return None;
        },
    };

    let mut names = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => names.push(s.clone()),
            Value::Number(n) => names.push(n.to_string()),
            Value::Null => {
                errors.add(field, NOT_NULL);
                return None;
            },
            _ => {
                errors.add(field, INVALID_VALUE);
                return None;
            },
        }
    }

    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_validate_name_success() {
        let mut errors = FieldErrors::default();
        let name = validate_name(&object(json!({"topping": "Ham"})), "topping", &mut errors);
        assert_eq!(name.as_deref(), Some("Ham"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_name_trims_whitespace() {
        let mut errors = FieldErrors::default();
        let name = validate_name(&object(json!({"pizza": "  Margherita "})), "pizza", &mut errors);
        assert_eq!(name.as_deref(), Some("Margherita"));
    }

    #[test]
    fn test_validate_name_missing() {
        let mut errors = FieldErrors::default();
        assert!(validate_name(&object(json!({})), "topping", &mut errors).is_none());
        assert_eq!(errors.get("topping"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_validate_name_null() {
        let mut errors = FieldErrors::default();
        assert!(validate_name(&object(json!({"topping": null})), "topping", &mut errors).is_none());
        assert_eq!(errors.get("topping"), Some(&[NOT_NULL.to_string()][..]));
    }

    #[test]
    fn test_validate_name_blank() {
        for blank in ["", "   ", "\t\n"] {
            let mut errors = FieldErrors::default();
            assert!(
                validate_name(&object(json!({"topping": blank})), "topping", &mut errors).is_none()
            );
            assert_eq!(errors.get("topping"), Some(&[NOT_BLANK.to_string()][..]));
        }
    }

    #[test]
    fn test_validate_name_length_is_counted_in_chars() {
        let mut errors = FieldErrors::default();
        let exact = "é".repeat(MAX_NAME_LENGTH);
        assert!(validate_name(&object(json!({"topping": exact})), "topping", &mut errors).is_some());

        let over = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name(&object(json!({"topping": over})), "topping", &mut errors).is_none());
        assert_eq!(errors.get("topping"), Some(&[too_long(MAX_NAME_LENGTH)][..]));
    }

    #[test]
    fn test_validate_name_accepts_numbers() {
        let mut errors = FieldErrors::default();
        let name = validate_name(&object(json!({"topping": 42})), "topping", &mut errors);
        assert_eq!(name.as_deref(), Some("42"));
    }

    #[test]
    fn test_validate_name_rejects_structures() {
        let mut errors = FieldErrors::default();
        assert!(validate_name(&object(json!({"topping": ["a"]})), "topping", &mut errors).is_none());
        assert_eq!(errors.get("topping"), Some(&[NOT_A_STRING.to_string()][..]));
    }

    #[test]
    fn test_validate_name_list() {
        let mut errors = FieldErrors::default();
        let names = validate_name_list(
            &object(json!({"toppings": ["Ham", "Cheese"]})),
            "toppings",
            &mut errors,
        );
        assert_eq!(names, Some(vec!["Ham".to_string(), "Cheese".to_string()]));

        let empty = validate_name_list(&object(json!({"toppings": []})), "toppings", &mut errors);
        assert_eq!(empty, Some(vec![]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_name_list_rejects_string() {
        let mut errors = FieldErrors::default();
        assert!(
            validate_name_list(&object(json!({"toppings": "Ham"})), "toppings", &mut errors)
                .is_none()
        );
        assert_eq!(
            errors.get("toppings"),
            Some(&["Expected a list of items but got type \"str\".".to_string()][..])
        );
    }

    #[test]
    fn test_validate_name_list_item_types() {
        let mut errors = FieldErrors::default();
        let names = validate_name_list(
            &object(json!({"toppings": ["Ham", 5, 2.5]})),
            "toppings",
            &mut errors,
        );
        assert_eq!(
            names,
            Some(vec!["Ham".to_string(), "5".to_string(), "2.5".to_string()])
        );

        for bad in [json!([true]), json!([["Ham"]]), json!([{"topping": "Ham"}])] {
            let mut errors = FieldErrors::default();
            let names = validate_name_list(&object(json!({"toppings": bad})), "toppings", &mut errors);
            assert!(names.is_none());
            assert_eq!(errors.get("toppings"), Some(&[INVALID_VALUE.to_string()][..]));
        }
    }

    #[test]
    fn test_validate_name_list_missing() {
        let mut errors = FieldErrors::default();
        assert!(validate_name_list(&object(json!({})), "toppings", &mut errors).is_none());
        assert!(errors.contains("toppings"));
    }

    #[test]
    fn test_expected_object_message() {
        assert_eq!(
            expected_object(&json!([1, 2])),
            "Invalid data. Expected a dictionary, but got list."
        );
        assert_eq!(
            expected_object(&json!("x")),
            "Invalid data. Expected a dictionary, but got str."
        );
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::default();
        errors.add("pizza", "Pizza already exists");
        errors.add("toppings", "Object with topping=Kale does not exist.");
        assert_eq!(
            errors.to_string(),
            "pizza: Pizza already exists; toppings: Object with topping=Kale does not exist."
        );
    }
}
