//! Rewrite instructions for string literals.
//!
//! A rewrite always replaces a whole string literal. The replacement values are written by the descriptor grammar
//! (see [`MemberReference`]'s [`Display`][std::fmt::Display] implementation), never spliced together from the
//! original text.

use serde::{Deserialize, Serialize};
use duke::tree::class::ClassNameSlice;
use crate::annotation::{Span, StringLiteral};
use crate::linkage::MemberReference;

/// Replace the string literal at `span` with one having the value `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteInstruction {
	pub span: Span,
	/// The value of the literal before the rewrite.
	pub original: String,
	pub replacement: String,
}

impl RewriteInstruction {
	/// The replacement as Java source code, with quotes and escapes.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use dukemixin::annotation::{Span, StringLiteral};
	/// use dukemixin::planner::plan_rewrite;
	///
	/// let literal = StringLiteral { value: "hhj".to_owned(), span: Span::new(20, 25) };
	/// let rewrite = plan_rewrite(&literal, "start".to_owned()).unwrap();
	/// assert_eq!(rewrite.replacement_source(), "\"start\"");
	/// ```
	pub fn replacement_source(&self) -> String {
		quote(&self.replacement)
	}
}

/// Plans replacing the literal with the new value. Gives [`None`] if the value doesn't change.
pub fn plan_rewrite(literal: &StringLiteral, replacement: String) -> Option<RewriteInstruction> {
	if literal.value == replacement {
		return None;
	}
	Some(RewriteInstruction {
		span: literal.span,
		original: literal.value.clone(),
		replacement,
	})
}

/// Writes the target of an `@At` for a member: `L<owner>;<member>`.
pub fn write_at_member(owner: &ClassNameSlice, member: &MemberReference) -> String {
	format!("L{owner};{member}")
}

/// Writes a Java string literal.
pub fn quote(s: &str) -> String {
	let mut result = String::with_capacity(s.len() + 2);
	result.push('"');
	for c in s.chars() {
		match c {
			'"' => result.push_str("\\\""),
			'\\' => result.push_str("\\\\"),
			'\n' => result.push_str("\\n"),
			'\r' => result.push_str("\\r"),
			'\t' => result.push_str("\\t"),
			'\u{8}' => result.push_str("\\b"),
			'\u{c}' => result.push_str("\\f"),
			c if c.is_control() => {
				let mut buf = [0u16; 2];
				for unit in c.encode_utf16(&mut buf) {
					result.push_str(&format!("\\u{unit:04x}"));
				}
			},
			c => result.push(c),
		}
	}
	result.push('"');
	result
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use duke::tree::class::ClassName;
	use crate::annotation::{Span, StringLiteral};
	use crate::linkage::MemberReference;
	use crate::planner::{plan_rewrite, quote, write_at_member};

	#[test]
	fn unchanged_values_are_not_rewritten() {
		let literal = StringLiteral { value: "jjjj".to_owned(), span: Span::new(3, 9) };
		assert_eq!(plan_rewrite(&literal, "jjjj".to_owned()), None);

		let rewrite = plan_rewrite(&literal, "start".to_owned());
		assert_eq!(rewrite.map(|x| (x.span, x.original, x.replacement)), Some((Span::new(3, 9), "jjjj".to_owned(), "start".to_owned())));
	}

	#[test]
	fn at_members() -> Result<()> {
		let owner = ClassName::try_from("TestTarget")?;
		assert_eq!(write_at_member(&owner, &MemberReference::parse("run()V")?), "LTestTarget;run()V");
		assert_eq!(write_at_member(&owner, &MemberReference::parse("age:I")?), "LTestTarget;age:I");
		Ok(())
	}

	#[test]
	fn quoting() {
		assert_eq!(quote("LTestTarget;run()V"), "\"LTestTarget;run()V\"");
		assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
		assert_eq!(quote("line\nbreak\t"), "\"line\\nbreak\\t\"");
		assert_eq!(quote("\u{0}"), "\"\\u0000\"");
		assert_eq!(quote("shadow$äge"), "\"shadow$äge\"");
	}
}
