//! Normalization between the two storage shapes of taxonomy fields.
//!
//! Some deployments keep `form`, `category`, and `chapter` as one-element
//! arrays (`["longform"]`) while others store plain text. Everything above the
//! repository edge only ever sees the scalar shape.

use serde::{Deserialize, Serialize};

/// Collapse a stored list into its scalar form.
///
/// Returns the first element, or an empty string when the list is missing or
/// empty. Additional elements are ignored without error.
pub fn array_to_string(values: Option<&[String]>) -> String {
    values
        .and_then(|values| values.first())
        .cloned()
        .unwrap_or_default()
}

/// Wrap a scalar into the single-element list shape.
pub fn string_to_array(value: &str) -> Vec<String> {
    vec![value.to_string()]
}

/// How a deployment persists taxonomy fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    #[default]
    Scalar,
    Array,
}

impl FieldShape {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldShape::Scalar => "scalar",
            FieldShape::Array => "array",
        }
    }
}

impl std::str::FromStr for FieldShape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scalar" => Ok(FieldShape::Scalar),
            "array" => Ok(FieldShape::Array),
            other => Err(format!("unknown field shape `{other}`")),
        }
    }
}

/// A taxonomy value as read from the store, in either shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlexibleField {
    Scalar(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl FlexibleField {
    pub fn into_scalar(self) -> String {
        match self {
            FlexibleField::Scalar(value) => value,
            FlexibleField::List(values) => array_to_string(Some(values.as_slice())),
            FlexibleField::Other(_) => String::new(),
        }
    }
}

impl From<Option<serde_json::Value>> for FlexibleField {
    fn from(value: Option<serde_json::Value>) -> Self {
        match value {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or(Self::Other(value)),
            None => Self::Other(serde_json::Value::Null),
        }
    }
}
