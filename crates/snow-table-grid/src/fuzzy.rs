//! Fuzzy ranking for the global search box

/// How well a cell's text matches a query, best last
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
	/// No match
	NoMatch,
	/// Every query character appears in order
	Subsequence,
	/// The query matches the initials of the words
	Acronym,
	/// The query appears anywhere
	Contains,
	/// A word starts with the query
	WordStartsWith,
	/// The text starts with the query
	StartsWith,
	/// Equal ignoring case
	Equal,
	/// Exactly equal
	CaseSensitiveEqual,
}

impl Rank {
	/// Whether this rank counts as a match
	pub fn is_match(self) -> bool {
		self != Self::NoMatch
	}
}

/// Ranks `text` against `query`, ignoring case
///
/// ```
/// use snow_table_grid::fuzzy::{Rank, rank};
///
/// assert_eq!(rank("John Doe", "john"), Rank::StartsWith);
/// assert_eq!(rank("John Doe", "doe"), Rank::WordStartsWith);
/// assert_eq!(rank("John Doe", "jhn"), Rank::Subsequence);
/// assert_eq!(rank("John Doe", "xyz"), Rank::NoMatch);
/// ```
pub fn rank(text: &str, query: &str) -> Rank {
	if text == query {
		return Rank::CaseSensitiveEqual;
	}

	let text = text.to_lowercase();
	let query = query.to_lowercase();
	if text == query {
		return Rank::Equal;
	}
	if text.starts_with(&query) {
		return Rank::StartsWith;
	}
	if text.split_whitespace().any(|word| word.starts_with(&query)) {
		return Rank::WordStartsWith;
	}
	if text.contains(&query) {
		return Rank::Contains;
	}

	let initials: String = text
		.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
		.filter_map(|word| word.chars().next())
		.collect();
	if initials.contains(&query) {
		return Rank::Acronym;
	}

	let mut remaining = text.chars();
	if query
		.chars()
		.all(|needle| remaining.any(|c| c == needle))
	{
		Rank::Subsequence
	} else {
		Rank::NoMatch
	}
}

/// Global-search predicate; an empty or blank query matches everything
pub fn fuzzy_matches(text: &str, query: &str) -> bool {
	let query = query.trim();
	query.is_empty() || rank(text, query).is_match()
}
