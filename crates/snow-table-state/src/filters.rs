//! Compact query-string encoding for column filters
//!
//! Column filters are persisted in a single `dt_filters` slot using the
//! grammar `key1:v1,v2|key2:v3`. Keys and values must not contain `:`, `,` or
//! `|`. Decoding never fails: malformed groups are dropped.

use indexmap::IndexMap;

/// Selected values per column key, in insertion order
///
/// A key is only present while at least one value is selected.
pub type ColumnFilters = IndexMap<String, Vec<String>>;

const GROUP_SEPARATOR: &str = "|";
const KEY_SEPARATOR: &str = ":";
const VALUE_SEPARATOR: &str = ",";

/// Encodes column filters into a `dt_filters` token
///
/// Empty-string values are dropped. Keys that are empty, or left without
/// values, are skipped entirely. An empty map encodes to `""`.
///
/// # Example
///
/// ```
/// use snow_table_state::{ColumnFilters, encode_filters};
///
/// let mut filters = ColumnFilters::new();
/// filters.insert("status".into(), vec!["ACTIVE".into(), "PENDING".into()]);
/// filters.insert("owner".into(), vec!["".into()]);
/// filters.insert("travelId".into(), vec!["id1".into()]);
///
/// assert_eq!(encode_filters(&filters), "status:ACTIVE,PENDING|travelId:id1");
/// ```
pub fn encode_filters(filters: &ColumnFilters) -> String {
	let groups: Vec<String> = filters
		.iter()
		.filter_map(|(key, values)| {
			let values: Vec<&str> = values
				.iter()
				.map(String::as_str)
				.filter(|value| !value.is_empty())
				.collect();
			if key.is_empty() || values.is_empty() {
				return None;
			}
			Some(format!("{key}{KEY_SEPARATOR}{}", values.join(VALUE_SEPARATOR)))
		})
		.collect();

	groups.join(GROUP_SEPARATOR)
}

/// Decodes a `dt_filters` token
///
/// Groups are split on `|` and each group on its first `:`. Groups missing a
/// key or a value part are dropped, as are empty values. When a key appears
/// more than once the last group wins, keeping the key's first position.
///
/// # Example
///
/// ```
/// use snow_table_state::decode_filters;
///
/// let filters = decode_filters(Some("status:ACTIVE||bogus|travelId: id1 , "));
///
/// assert_eq!(filters.len(), 2);
/// assert_eq!(filters["status"], vec!["ACTIVE"]);
/// assert_eq!(filters["travelId"], vec!["id1"]);
/// ```
pub fn decode_filters(token: Option<&str>) -> ColumnFilters {
	let mut filters = ColumnFilters::new();
	let Some(token) = token else {
		return filters;
	};

	for group in token.split(GROUP_SEPARATOR).map(str::trim) {
		let Some((key, rest)) = group.split_once(KEY_SEPARATOR) else {
			continue;
		};
		let (key, rest) = (key.trim(), rest.trim());
		if key.is_empty() || rest.is_empty() {
			continue;
		}

		let values: Vec<String> = rest
			.split(VALUE_SEPARATOR)
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.map(str::to_owned)
			.collect();

		if !values.is_empty() {
			filters.insert(key.to_owned(), values);
		}
	}

	filters
}
