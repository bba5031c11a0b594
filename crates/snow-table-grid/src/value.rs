//! Field access and cell printing over serialized rows
//!
//! Rows are any `serde::Serialize` type. The row model serializes each row to
//! a [`serde_json::Value`] once and reads fields by key from it.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Serializes a row for field access
pub fn row_value<T: Serialize>(row: &T) -> Result<Value> {
	Ok(serde_json::to_value(row)?)
}

/// Reads a top-level field from a serialized row
pub fn field<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
	row.get(key)
}

/// Text shown in a cell for a raw field value
///
/// Scalars print as text and `null` prints as `"null"`. Arrays and objects
/// print as pretty JSON. An absent field prints as empty text.
///
/// ```
/// use serde_json::json;
/// use snow_table_grid::print_value;
///
/// assert_eq!(print_value(Some(&json!("Ada"))), "Ada");
/// assert_eq!(print_value(Some(&json!(42))), "42");
/// assert_eq!(print_value(Some(&json!(null))), "null");
/// assert_eq!(print_value(None), "");
/// assert_eq!(print_value(Some(&json!({"a": 1}))), "{\n  \"a\": 1\n}");
/// ```
pub fn print_value(value: Option<&Value>) -> String {
	match value {
		None => String::new(),
		Some(Value::String(s)) => s.clone(),
		Some(Value::Null) => "null".to_string(),
		Some(value @ (Value::Bool(_) | Value::Number(_))) => value.to_string(),
		Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
	}
}

/// Orders two cell values for sorting
///
/// Numbers compare numerically, strings lexically and booleans with `false`
/// first. Mixed kinds fall back to comparing their printed text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
	match (a, b) {
		(Value::Number(a), Value::Number(b)) => {
			let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
			a.partial_cmp(&b).unwrap_or(Ordering::Equal)
		}
		(Value::String(a), Value::String(b)) => a.cmp(b),
		(Value::Bool(a), Value::Bool(b)) => a.cmp(b),
		(a, b) => print_value(Some(a)).cmp(&print_value(Some(b))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[derive(Serialize)]
	#[serde(rename_all = "camelCase")]
	struct Travel {
		id: u32,
		travel_name: String,
		tags: Vec<&'static str>,
	}

	#[rstest]
	fn test_field_uses_serialized_names() {
		let row = row_value(&Travel {
			id: 7,
			travel_name: "Lisbon".into(),
			tags: vec!["sea"],
		})
		.unwrap();

		assert_eq!(field(&row, "travelName"), Some(&json!("Lisbon")));
		assert_eq!(field(&row, "travel_name"), None);
		assert_eq!(print_value(field(&row, "tags")), "[\n  \"sea\"\n]");
	}

	#[rstest]
	#[case(json!(true), "true")]
	#[case(json!(1.5), "1.5")]
	#[case(json!(""), "")]
	fn test_print_scalars(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(print_value(Some(&value)), expected);
	}

	#[rstest]
	#[case(json!(2), json!(10), Ordering::Less)]
	#[case(json!("b"), json!("a"), Ordering::Greater)]
	#[case(json!(false), json!(true), Ordering::Less)]
	#[case(json!(10), json!("9"), Ordering::Less)]
	fn test_compare_values(#[case] a: Value, #[case] b: Value, #[case] expected: Ordering) {
		assert_eq!(compare_values(&a, &b), expected);
	}
}
