//! Deriving member names from the names of accessor and invoker methods, and back.
//!
//! An accessor `getAge` targets the field `age`, an invoker `callRun` the method `run`. Once the target member has
//! a deobfuscated name, [`AccessorName::prefix`] gives the deobfuscated name of the accessor.

use crate::linkage::AccessorType;

/// An accessor method name, split into its prefix and the inflected name of the target member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorName<'a> {
	pub method_name: &'a str,
	pub prefix: &'static str,
	/// The name of the target member.
	pub name: String,
}

/// The marker of names of methods that mixin merged into a class.
const MERGED_SUFFIX: &str = "_$md";

impl<'a> AccessorName<'a> {
	/// Splits an accessor name, lowercasing the first character of the member name, unless the whole member name is
	/// uppercase (like for `getMAX_VALUE`).
	///
	/// Gives [`None`] if the name doesn't start with a known prefix followed by an uppercase letter.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use dukemixin::inflector::AccessorName;
	///
	/// let name = AccessorName::of("getAge").unwrap();
	/// assert_eq!((name.prefix, name.name.as_str()), ("get", "age"));
	/// assert_eq!(AccessorName::of("isMAX_VALUE").unwrap().name, "MAX_VALUE");
	/// assert_eq!(AccessorName::of("callRun_$md$12ab$0").unwrap().name, "run");
	/// assert_eq!(AccessorName::of("getter"), None);
	/// assert_eq!(AccessorName::of("age"), None);
	/// ```
	pub fn of(method_name: &'a str) -> Option<AccessorName<'a>> {
		AccessorName::of_with_case(method_name, true)
	}

	/// Like [`AccessorName::of`], but only lowercases if `to_member_case` is set.
	pub fn of_with_case(method_name: &'a str, to_member_case: bool) -> Option<AccessorName<'a>> {
		let (prefix, rest) = AccessorType::ALL.iter()
			.flat_map(|accessor_type| accessor_type.prefixes())
			.find_map(|&prefix| {
				method_name.strip_prefix(prefix)
					.filter(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
					.map(|rest| (prefix, rest))
			})?;

		// the first char is ascii, so `1` is a char boundary
		let name_part = match rest[1..].find(MERGED_SUFFIX) {
			Some(index) => &rest[..1 + index],
			None => rest,
		};

		let is_upper_case = name_part.to_uppercase() == name_part;

		let mut name = String::with_capacity(name_part.len());
		let mut chars = name_part.chars();
		if let Some(first) = chars.next() {
			if to_member_case && !is_upper_case {
				name.push(first.to_ascii_lowercase());
			} else {
				name.push(first);
			}
		}
		name.extend(chars);

		Some(AccessorName { method_name, prefix, name })
	}

	/// Builds the accessor name for a member name, using the prefix of this accessor.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use dukemixin::inflector::AccessorName;
	///
	/// let name = AccessorName::of("getYu").unwrap();
	/// assert_eq!(name.prefix("age"), "getAge");
	/// ```
	pub fn prefix(&self, name: &str) -> String {
		apply_prefix(self.prefix, name)
	}
}

/// Concatenates the prefix and the name, uppercasing the first character of the name.
pub fn apply_prefix(prefix: &str, name: &str) -> String {
	let mut chars = name.chars();
	let mut result = String::with_capacity(prefix.len() + name.len());
	result.push_str(prefix);
	if let Some(first) = chars.next() {
		result.extend(first.to_uppercase());
	}
	result.push_str(chars.as_str());
	result
}
