use std::fmt::{Display, Formatter};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use crate::macros::{make_display, make_string_str_like};

make_string_str_like!(
	/// Represents a field name.
	pub FieldName(String);
	/// A [`FieldName`] slice.
	pub FieldNameSlice(str);
	is_valid(s) = if crate::tree::names::is_valid_unqualified_name(s) {
		Ok(())
	} else {
		bail!("invalid field name: must be non-empty and not contain any of `.`, `;`, `[` and `/`")
	};
);
make_display!(FieldName, FieldNameSlice);

make_string_str_like!(
	/// Represents a field descriptor, like `I` or `Ljava/lang/Object;`.
	///
	/// Use [`FieldDescriptorSlice::parse`][crate::tree::field::FieldDescriptorSlice::parse] to get at the type.
	pub FieldDescriptor(String);
	/// A [`FieldDescriptor`] slice.
	pub FieldDescriptorSlice(str);
	is_valid(s) = crate::tree::descriptor::parse_field_descriptor(s).map(|_| ());
);
make_display!(FieldDescriptor, FieldDescriptorSlice);

/// Identifies a field of a class.
///
/// The descriptor is optional: a signature without one matches fields by name only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldSignature {
	pub name: FieldName,
	pub desc: Option<FieldDescriptor>,
}

impl FieldSignature {
	pub fn new(name: FieldName, desc: Option<FieldDescriptor>) -> FieldSignature {
		FieldSignature { name, desc }
	}

	/// Creates a signature without descriptor.
	pub fn untyped(name: FieldName) -> FieldSignature {
		FieldSignature { name, desc: None }
	}

	/// Returns a copy of this signature with the descriptor dropped.
	pub fn without_desc(&self) -> FieldSignature {
		FieldSignature::untyped(self.name.clone())
	}
}

/// Writes `name:desc`, or just `name` if there's no descriptor.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use duke::tree::field::{FieldDescriptor, FieldName, FieldSignature};
/// let signature = FieldSignature::new(
///     FieldName::try_from("age").unwrap(),
///     Some(FieldDescriptor::try_from("I").unwrap()),
/// );
/// assert_eq!(signature.to_string(), "age:I");
/// assert_eq!(signature.without_desc().to_string(), "age");
/// ```
impl Display for FieldSignature {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.desc {
			Some(desc) => write!(f, "{}:{}", self.name, desc),
			None => write!(f, "{}", self.name),
		}
	}
}

impl FieldSignature {
	/// Parses the `name:desc` or `name` notation written by the [`Display`] implementation.
	pub fn parse(s: &str) -> Result<FieldSignature> {
		match s.split_once(':') {
			Some((name, desc)) => Ok(FieldSignature::new(FieldName::try_from(name)?, Some(FieldDescriptor::try_from(desc)?))),
			None => Ok(FieldSignature::untyped(FieldName::try_from(s)?)),
		}
	}
}
