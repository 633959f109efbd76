//! Annotations of declarations, as handed over by the source analysis.
//!
//! Everything in here is already resolved: class literals carry the binary name of the class, string literals carry
//! both their value and their position in the source file, and annotation names are fully qualified.
//!
//! Annotation elements that may be given either as a single value or as an array (like `method = "a"` and
//! `method = {"a", "b"}`) are read the same way, see [`ElementValue::elements`].

use std::fmt::{Display, Formatter};
use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use duke::tree::class::{ClassName, ClassNameSlice};

/// A byte range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

impl Span {
	pub fn new(start: usize, end: usize) -> Span {
		Span { start, end }
	}
}

impl Display for Span {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}

/// A string literal in the source, with the span covering the quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLiteral {
	pub value: String,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
	/// The binary name of the annotation type, like `org.spongepowered.asm.mixin.Shadow`.
	pub name: String,
	pub span: Span,
	/// The element value pairs, in source order. For the single element form `@A("x")` this is a pair named `value`.
	#[serde(default)]
	pub values: Vec<ElementValuePair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementValuePair {
	pub name: String,
	pub value: ElementValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementValue {
	String(StringLiteral),
	Int(i64),
	Boolean(bool),
	Enum {
		type_name: ClassName,
		const_name: String,
	},
	Class(ClassName),
	Annotation(Annotation),
	Array(Vec<ElementValue>),
}

impl Annotation {
	pub fn is(&self, name: &str) -> bool {
		self.name == name
	}

	/// The name without the package, for messages.
	pub fn simple_name(&self) -> &str {
		self.name.rsplit_once('.').map_or(self.name.as_str(), |(_, simple)| simple)
	}

	pub fn get(&self, name: &str) -> Option<&ElementValue> {
		self.values.iter()
			.find(|pair| pair.name == name)
			.map(|pair| &pair.value)
	}

	/// Gets an element that must be a single string.
	pub fn get_string(&self, name: &str) -> Result<Option<&StringLiteral>> {
		self.get(name)
			.map(|value| value.as_string().ok_or_else(|| self.unexpected(name, "a string", value)))
			.transpose()
	}

	/// Gets an element that must be a string or an array of strings. Missing elements give an empty list.
	pub fn get_strings(&self, name: &str) -> Result<Vec<&StringLiteral>> {
		self.get_all(name, "a string", ElementValue::as_string)
	}

	/// Gets an element that must be a class literal or an array of them.
	pub fn get_classes(&self, name: &str) -> Result<Vec<&ClassNameSlice>> {
		self.get_all(name, "a class literal", ElementValue::as_class)
	}

	/// Gets an element that must be an annotation or an array of them.
	pub fn get_annotations(&self, name: &str) -> Result<Vec<&Annotation>> {
		self.get_all(name, "an annotation", ElementValue::as_annotation)
	}

	/// Gets an element that must be a single annotation.
	pub fn get_annotation(&self, name: &str) -> Result<Option<&Annotation>> {
		self.get(name)
			.map(|value| value.as_annotation().ok_or_else(|| self.unexpected(name, "an annotation", value)))
			.transpose()
	}

	fn get_all<'a, T: ?Sized>(
		&'a self,
		name: &str,
		expected: &str,
		f: impl Fn(&'a ElementValue) -> Option<&'a T>,
	) -> Result<Vec<&'a T>> {
		let Some(value) = self.get(name) else {
			return Ok(Vec::new());
		};
		value.elements().iter()
			.map(|element| f(element).ok_or_else(|| self.unexpected(name, expected, element)))
			.collect()
	}

	fn unexpected(&self, name: &str, expected: &str, value: &ElementValue) -> anyhow::Error {
		anyhow!("expected {expected} for element `{name}` of @{}, got {value:?}", self.simple_name())
	}

	/// Checks that there are no elements other than the given ones.
	pub fn check_elements(&self, allowed: &[&str]) -> Result<()> {
		for pair in &self.values {
			if !allowed.contains(&pair.name.as_str()) {
				bail!("unknown element `{}` in @{}", pair.name, self.simple_name());
			}
		}
		Ok(())
	}
}

impl ElementValue {
	/// The elements of an array, or the value itself if it's not an array.
	pub fn elements(&self) -> &[ElementValue] {
		match self {
			ElementValue::Array(elements) => elements,
			other => std::slice::from_ref(other),
		}
	}

	pub fn as_string(&self) -> Option<&StringLiteral> {
		match self {
			ElementValue::String(literal) => Some(literal),
			_ => None,
		}
	}

	pub fn as_class(&self) -> Option<&ClassNameSlice> {
		match self {
			ElementValue::Class(class) => Some(class),
			_ => None,
		}
	}

	pub fn as_annotation(&self) -> Option<&Annotation> {
		match self {
			ElementValue::Annotation(annotation) => Some(annotation),
			_ => None,
		}
	}
}
