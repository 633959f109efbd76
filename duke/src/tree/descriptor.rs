use std::fmt::{Display, Formatter, Write};
use std::iter::Peekable;
use std::str::Chars;
use anyhow::{anyhow, bail, Context, Result};
use crate::tree::class::{ClassName, ClassNameSlice};
use crate::tree::field::{FieldDescriptor, FieldDescriptorSlice};
use crate::tree::method::{MethodDescriptor, MethodDescriptorSlice};

/// Represents a type.
///
/// In case of an array, use the [`Type::Array`] variant.
///
/// ```
/// use duke::tree::descriptor::{ArrayType, Type};
///
/// // the type of a java `int`
/// let int_type = Type::I;
///
/// // the type of a java `int[][]`
/// let int_array_type = Type::Array(2, ArrayType::I);
///
/// assert_ne!(int_type, int_array_type);
/// ```
///
/// Note: you should never construct the [`Type::Array`] variant with a dimension
/// of zero, as the [`Eq`] and [`PartialEq`] implementations don't respect that.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Type {
	/// A `byte`. In rust, this is a `i8`.
	B,
	/// A `char`.
	C,
	/// A `double`. In rust, this is a `f64`.
	D,
	/// A `float`. In rust, this is a `f32`.
	F,
	/// An `int`. In rust, this is a `i32`.
	I,
	/// A `long`. In rust, this is a `i64`.
	J,
	/// A `short`. In rust, this is a `i16`.
	S,
	/// A `boolean`. In rust, this is a `bool`.
	Z,
	/// An instance of the class specified by [`ClassName`].
	Object(ClassName),
	/// An array type, represented by the dimension and the inner [`ArrayType`].
	Array(u8, ArrayType),
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ArrayType {
	B,
	C,
	D,
	F,
	I,
	J,
	S,
	Z,
	Object(ClassName),
}

impl Type {
	/// Returns the class name this type refers to, looking through arrays.
	pub fn class_name(&self) -> Option<&ClassNameSlice> {
		match self {
			Type::Object(class_name) | Type::Array(_, ArrayType::Object(class_name)) => Some(class_name),
			_ => None,
		}
	}

	/// Replaces the class name this type refers to, if any, keeping the array dimension.
	pub fn map_class_name(self, f: impl FnOnce(ClassName) -> ClassName) -> Type {
		match self {
			Type::Object(class_name) => Type::Object(f(class_name)),
			Type::Array(dimension, ArrayType::Object(class_name)) => Type::Array(dimension, ArrayType::Object(f(class_name))),
			other => other,
		}
	}
}

impl ArrayType {
	/// The base type of one of the primitive descriptor characters `BCDFIJSZ`.
	fn primitive(c: char) -> Option<ArrayType> {
		Some(match c {
			'B' => ArrayType::B,
			'C' => ArrayType::C,
			'D' => ArrayType::D,
			'F' => ArrayType::F,
			'I' => ArrayType::I,
			'J' => ArrayType::J,
			'S' => ArrayType::S,
			'Z' => ArrayType::Z,
			_ => return None,
		})
	}

	fn into_type(self) -> Type {
		match self {
			ArrayType::B => Type::B,
			ArrayType::C => Type::C,
			ArrayType::D => Type::D,
			ArrayType::F => Type::F,
			ArrayType::I => Type::I,
			ArrayType::J => Type::J,
			ArrayType::S => Type::S,
			ArrayType::Z => Type::Z,
			ArrayType::Object(class_name) => Type::Object(class_name),
		}
	}
}

// The grammar for descriptors is:
//   FieldDescriptor:
//     FieldType
//
//   MethodDescriptor:
//     "(" FieldType* ")" ReturnDescriptor
//
//   ReturnDescriptor:
//     FieldType | "V"
//
//   FieldType:
//     "B" | "C" | "D" | "F" | "I" | "J" | "S" | "Z" |
//     "L" ClassName ";" |
//     "[" FieldType
fn read_field_type(chars: &mut Peekable<Chars>) -> Result<Type> {
	let mut array_dimension: u8 = 0;
	while chars.next_if_eq(&'[').is_some() {
		array_dimension = array_dimension.checked_add(1)
			.ok_or_else(|| anyhow!("array dimension of descriptor exceeds 255"))?;
	}

	let base = match chars.next() {
		Some('L') => ArrayType::Object(read_class_name(chars)?),
		Some(c) => ArrayType::primitive(c).ok_or_else(|| anyhow!("unexpected char {c:?} in descriptor"))?,
		None => bail!("unexpected abrupt ending of descriptor"),
	};

	Ok(if array_dimension == 0 {
		base.into_type()
	} else {
		Type::Array(array_dimension, base)
	})
}

/// Reads the class name of an object type, up to and including the `;`.
fn read_class_name(chars: &mut Peekable<Chars>) -> Result<ClassName> {
	let mut s = String::new();
	loop {
		match chars.next() {
			Some(';') => break,
			Some(c) => s.push(c),
			None => bail!("object type {s:?} of descriptor isn't terminated by ';'"),
		}
	}
	ClassName::try_from(s).context("in object type of descriptor")
}

fn write_field_type(t: &Type, w: &mut impl Write) -> std::fmt::Result {
	let (array_dimension, base) = match t {
		Type::B => return w.write_char('B'),
		Type::C => return w.write_char('C'),
		Type::D => return w.write_char('D'),
		Type::F => return w.write_char('F'),
		Type::I => return w.write_char('I'),
		Type::J => return w.write_char('J'),
		Type::S => return w.write_char('S'),
		Type::Z => return w.write_char('Z'),
		Type::Object(class_name) => return write!(w, "L{};", class_name.as_str()),
		Type::Array(array_dimension, base) => (*array_dimension, base),
	};

	for _ in 0..array_dimension {
		w.write_char('[')?;
	}
	match base {
		ArrayType::B => w.write_char('B'),
		ArrayType::C => w.write_char('C'),
		ArrayType::D => w.write_char('D'),
		ArrayType::F => w.write_char('F'),
		ArrayType::I => w.write_char('I'),
		ArrayType::J => w.write_char('J'),
		ArrayType::S => w.write_char('S'),
		ArrayType::Z => w.write_char('Z'),
		ArrayType::Object(class_name) => write!(w, "L{};", class_name.as_str()),
	}
}

/// Writes the type in descriptor notation.
///
/// ```
/// use duke::tree::descriptor::{ArrayType, Type};
/// assert_eq!(Type::Array(2, ArrayType::I).to_string(), "[[I");
/// ```
impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write_field_type(self, f)
	}
}

pub(crate) fn parse_field_descriptor(s: &str) -> Result<ParsedFieldDescriptor> {
	let mut chars = s.chars().peekable();

	let descriptor = read_field_type(&mut chars)
		.with_context(|| anyhow!("failed to read field descriptor {s:?}"))?;

	if chars.peek().is_some() {
		bail!("expected end of field descriptor {s:?}, got {:?} remaining", String::from_iter(chars));
	}

	Ok(ParsedFieldDescriptor(descriptor))
}

pub(crate) fn parse_method_descriptor(s: &str) -> Result<ParsedMethodDescriptor> {
	let mut chars = s.chars().peekable();

	if chars.next_if_eq(&'(').is_none() {
		bail!("method descriptor {s:?} doesn't start with '('");
	}

	let mut parameter_descriptors = Vec::new();
	loop {
		if chars.next_if_eq(&')').is_some() {
			break;
		}

		let descriptor = read_field_type(&mut chars)
			.with_context(|| anyhow!("failed to read parameter descriptor of {s:?}"))?;
		parameter_descriptors.push(descriptor);
	}

	let return_descriptor = if chars.next_if_eq(&'V').is_some() {
		None
	} else {
		let descriptor = read_field_type(&mut chars)
			.with_context(|| anyhow!("failed to read return descriptor of {s:?}"))?;

		Some(descriptor)
	};

	if chars.peek().is_some() {
		bail!("expected end of method descriptor {s:?}, got {:?} remaining", String::from_iter(chars));
	}

	Ok(ParsedMethodDescriptor {
		parameter_descriptors,
		return_descriptor,
	})
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedFieldDescriptor(pub Type);

impl FieldDescriptorSlice {
	/// Parses a field descriptor.
	///
	/// A field descriptor is defined by the [grammar](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.3.2) in the
	/// Java Virtual Machine Specification.
	///
	/// The inverse of this function is [`ParsedFieldDescriptor::write`].
	///
	/// # Examples
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use duke::tree::descriptor::{ArrayType, ParsedFieldDescriptor, Type};
	/// use duke::tree::field::FieldDescriptor;
	///
	/// assert_eq!(
	///     FieldDescriptor::try_from("Ljava/lang/Object;").unwrap().parse().unwrap(),
	///     ParsedFieldDescriptor(Type::Object(ClassName::JAVA_LANG_OBJECT.to_owned()))
	/// );
	///
	/// let double_array = FieldDescriptor::try_from("[[[D").unwrap();
	/// assert_eq!(double_array.parse().unwrap(), ParsedFieldDescriptor(Type::Array(3, ArrayType::D)));
	/// assert_eq!(double_array, double_array.parse().unwrap().write());
	/// ```
	pub fn parse(&self) -> Result<ParsedFieldDescriptor> {
		parse_field_descriptor(self.as_str())
	}
}

impl ParsedFieldDescriptor {
	/// Writes a field descriptor.
	///
	/// The inverse of this function is [`FieldDescriptorSlice::parse`].
	pub fn write(&self) -> FieldDescriptor {
		// SAFETY: the string is written by the descriptor grammar, and the class names are valid.
		unsafe { FieldDescriptor::from_inner_unchecked(self.0.to_string()) }
	}
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedMethodDescriptor {
	pub parameter_descriptors: Vec<Type>,
	/// The return type, [`None`] for `V`.
	pub return_descriptor: Option<Type>,
}

impl MethodDescriptorSlice {
	/// Parses a method descriptor.
	///
	/// The inverse of this function is [`ParsedMethodDescriptor::write`].
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::descriptor::Type;
	/// use duke::tree::method::MethodDescriptor;
	///
	/// let desc = MethodDescriptor::try_from("(ID)V").unwrap().parse().unwrap();
	/// assert_eq!(desc.parameter_descriptors, vec![Type::I, Type::D]);
	/// assert_eq!(desc.return_descriptor, None);
	/// ```
	pub fn parse(&self) -> Result<ParsedMethodDescriptor> {
		parse_method_descriptor(self.as_str())
	}
}

impl ParsedMethodDescriptor {
	pub fn write(&self) -> MethodDescriptor {
		// SAFETY: the string is written by the descriptor grammar, and the class names are valid.
		unsafe { MethodDescriptor::from_inner_unchecked(self.to_string()) }
	}
}

impl Display for ParsedMethodDescriptor {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_char('(')?;
		for parameter_descriptor in &self.parameter_descriptors {
			Display::fmt(parameter_descriptor, f)?;
		}
		f.write_char(')')?;
		match &self.return_descriptor {
			Some(return_descriptor) => Display::fmt(return_descriptor, f),
			None => f.write_char('V'),
		}
	}
}

impl FieldDescriptor {
	/// Creates a field descriptor of the class name given.
	///
	/// This is equivalent to `"L" + class_name + ";"`:
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use duke::tree::field::FieldDescriptor;
	/// let a = FieldDescriptor::try_from("Ljava/lang/Object;").unwrap();
	/// let b = FieldDescriptor::from_class(ClassName::JAVA_LANG_OBJECT);
	/// assert_eq!(a, b);
	/// ```
	pub fn from_class(class_name: &ClassNameSlice) -> FieldDescriptor {
		ParsedFieldDescriptor(Type::Object(class_name.to_owned())).write()
	}
}
