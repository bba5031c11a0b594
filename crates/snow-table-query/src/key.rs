//! Cache keys

use std::fmt;

use serde::{Deserialize, Serialize};

/// One primitive component of a [`QueryKey`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPart {
	/// Absent value
	Null,
	/// Boolean
	Bool(bool),
	/// Integer
	Int(i64),
	/// Text
	Str(String),
}

impl fmt::Display for KeyPart {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(i) => write!(f, "{i}"),
			Self::Str(s) => f.write_str(s),
		}
	}
}

impl From<&str> for KeyPart {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for KeyPart {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<&String> for KeyPart {
	fn from(value: &String) -> Self {
		Self::Str(value.clone())
	}
}

impl From<bool> for KeyPart {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for KeyPart {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<usize> for KeyPart {
	fn from(value: usize) -> Self {
		Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
	}
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// Ordered sequence of primitives identifying cached data
///
/// Two keys are equal when every part is equal.
///
/// ```
/// use snow_table_query::QueryKey;
///
/// let key = QueryKey::new(["travels"]).with("server").with(2usize).with(None::<String>);
///
/// assert_eq!(key.to_string(), "travels/server/2/null");
/// assert!(key.starts_with(&QueryKey::new(["travels"])));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
	/// Key from a list of parts
	pub fn new<I, P>(parts: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<KeyPart>,
	{
		Self(parts.into_iter().map(Into::into).collect())
	}

	/// Appends a part
	pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
		self.0.push(part.into());
		self
	}

	/// The parts, in order
	pub fn parts(&self) -> &[KeyPart] {
		&self.0
	}

	/// Whether `prefix`'s parts begin this key
	pub fn starts_with(&self, prefix: &QueryKey) -> bool {
		self.0.starts_with(&prefix.0)
	}
}

impl fmt::Display for QueryKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, part) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str("/")?;
			}
			write!(f, "{part}")?;
		}
		Ok(())
	}
}
