//! Problems found while remapping. None of them stop the remapping, they're collected and reported at the end.

use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use duke::tree::class::ClassName;
use crate::annotation::Span;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
	/// An annotation couldn't be read, so the declaration was skipped.
	MalformedLinkage {
		class: ClassName,
		/// The member, as `name` and descriptor, or [`None`] for annotations of the class.
		member: Option<String>,
		message: String,
	},
	/// A target without descriptor matched methods with different deobfuscated names. The literal was kept.
	AmbiguousOverload {
		class: ClassName,
		member: Option<String>,
		target: String,
		span: Span,
		candidates: Vec<String>,
	},
	/// The targets of a mixin gave different results for the same declaration. The first one was used.
	ConflictingTargets {
		class: ClassName,
		member: Option<String>,
		chosen: String,
		chosen_target: ClassName,
		other: String,
		other_target: ClassName,
	},
}

fn write_location(f: &mut Formatter<'_>, class: &ClassName, member: &Option<String>) -> std::fmt::Result {
	match member {
		Some(member) => write!(f, "{class}.{member}"),
		None => write!(f, "{class}"),
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Diagnostic::MalformedLinkage { class, member, message } => {
				write!(f, "malformed linkage in ")?;
				write_location(f, class, member)?;
				write!(f, ": {message}")
			},
			Diagnostic::AmbiguousOverload { class, member, target, span, candidates } => {
				write!(f, "ambiguous target {target:?} at {span} in ")?;
				write_location(f, class, member)?;
				write!(f, ", candidates: {}", candidates.join(", "))
			},
			Diagnostic::ConflictingTargets { class, member, chosen, chosen_target, other, other_target } => {
				write!(f, "conflicting targets for ")?;
				write_location(f, class, member)?;
				write!(f, ": {chosen:?} from {chosen_target}, but {other:?} from {other_target}")
			},
		}
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use duke::tree::class::ClassName;
	use crate::annotation::Span;
	use crate::diagnostic::Diagnostic;

	#[test]
	fn display_and_json() -> Result<()> {
		let diagnostic = Diagnostic::AmbiguousOverload {
			class: ClassName::try_from("TestTargetMixin")?,
			member: Some("onStart(Lorg/spongepowered/asm/mixin/injection/callback/CallbackInfo;)V".to_owned()),
			target: "a".to_owned(),
			span: Span::new(10, 13),
			candidates: vec!["a()V -> tick".to_owned(), "a(I)V -> tickTimes".to_owned()],
		};

		assert_eq!(
			diagnostic.to_string(),
			"ambiguous target \"a\" at 10..13 in TestTargetMixin.onStart(Lorg/spongepowered/asm/mixin/injection/callback/CallbackInfo;)V, \
			candidates: a()V -> tick, a(I)V -> tickTimes"
		);

		let json = serde_json::to_value(&diagnostic)?;
		assert_eq!(json["kind"], "ambiguous_overload");
		assert_eq!(json["class"], "TestTargetMixin");
		Ok(())
	}
}
