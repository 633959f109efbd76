use std::fmt::{Display, Formatter};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use crate::macros::{make_display, make_string_str_like};

make_string_str_like!(
	/// Represents a method name.
	pub MethodName(String);
	/// A [`MethodName`] slice.
	pub MethodNameSlice(str);
	is_valid(s) = if crate::tree::names::is_valid_method_name(s) {
		Ok(())
	} else {
		bail!("invalid method name: must be either `<init>`, `<clinit>` or non-empty and not contain any of `.`, `;`, `[`, `/`, `<` and `>`")
	};
);
make_display!(MethodName, MethodNameSlice);

impl MethodName {
	pub const INIT: &'static MethodNameSlice = {
		// SAFETY: `<init>` is a valid method name.
		unsafe { MethodNameSlice::from_inner_unchecked("<init>") }
	};
	pub const CLINIT: &'static MethodNameSlice = {
		// SAFETY: `<clinit>` is a valid method name.
		unsafe { MethodNameSlice::from_inner_unchecked("<clinit>") }
	};
}

impl MethodNameSlice {
	/// Checks if this is `<init>` or `<clinit>`.
	pub fn is_special(&self) -> bool {
		self == MethodName::INIT || self == MethodName::CLINIT
	}
}

make_string_str_like!(
	/// Represents a method descriptor, like `(ILjava/lang/String;)V`.
	pub MethodDescriptor(String);
	/// A [`MethodDescriptor`] slice.
	pub MethodDescriptorSlice(str);
	is_valid(s) = crate::tree::descriptor::parse_method_descriptor(s).map(|_| ());
);
make_display!(MethodDescriptor, MethodDescriptorSlice);

/// Identifies a method of a class.
///
/// Unlike [fields][crate::tree::field::FieldSignature], methods are always identified with their descriptor, as overloads
/// can only be told apart by it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

impl MethodSignature {
	pub fn new(name: MethodName, desc: MethodDescriptor) -> MethodSignature {
		MethodSignature { name, desc }
	}

	/// Parses the `name(args)ret` notation written by the [`Display`] implementation.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::method::MethodSignature;
	/// let signature = MethodSignature::parse("run()V").unwrap();
	/// assert_eq!(signature.name.as_str(), "run");
	/// assert_eq!(signature.desc.as_str(), "()V");
	/// assert_eq!(signature.to_string(), "run()V");
	///
	/// assert!(MethodSignature::parse("run").is_err());
	/// ```
	pub fn parse(s: &str) -> Result<MethodSignature> {
		let Some(index) = s.find('(') else {
			bail!("method signature {s:?} has no descriptor");
		};
		let (name, desc) = s.split_at(index);
		Ok(MethodSignature::new(MethodName::try_from(name)?, MethodDescriptor::try_from(desc)?))
	}
}

impl Display for MethodSignature {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.name, self.desc)
	}
}
