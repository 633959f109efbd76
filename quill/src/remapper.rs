//! Remapping of class names and descriptors from the obfuscated into the deobfuscated namespace.
//!
//! The [`ClassRemapper`] trait only requires [`ClassRemapper::map_class_fail`], everything else is built on top
//! of it. [`MappingSet`] implements it.
//!
//! # What is a "remapper"?
//! A remapper answers the question for you "what is the name of X in the other namespace?"

use anyhow::{Context, Result};
use duke::tree::class::{ClassName, ClassNameSlice};
use duke::tree::descriptor::{ParsedFieldDescriptor, ParsedMethodDescriptor, Type};
use duke::tree::field::{FieldDescriptor, FieldDescriptorSlice};
use duke::tree::method::{MethodDescriptor, MethodDescriptorSlice};
use crate::tree::mappings::MappingSet;

/// A remapper supporting remapping of class names and descriptors.
pub trait ClassRemapper {
	/// Maps a class name to a new one, if the mapping exists.
	///
	/// If the mapping doesn't exist, returns `Ok(None)`.
	fn map_class_fail(&self, class: &ClassNameSlice) -> Result<Option<ClassName>>;

	/// Maps a class name to a new one, if the mapping doesn't exist, return the old one.
	///
	/// Do not implement this yourself.
	fn map_class(&self, class: &ClassNameSlice) -> Result<ClassName> {
		Ok(self.map_class_fail(class)?.unwrap_or_else(|| class.to_owned()))
	}

	/// Maps the class names in a type, keeping primitives and array dimensions.
	///
	/// Do not implement this yourself.
	fn map_type(&self, t: &Type) -> Result<Type> {
		Ok(match t.class_name() {
			Some(class_name) => {
				let new_class_name = self.map_class(class_name)?;
				t.clone().map_class_name(|_| new_class_name)
			},
			None => t.clone(),
		})
	}

	/// Maps a field descriptor to a new one.
	///
	/// The result is written by the descriptor grammar.
	///
	/// Do not implement this yourself.
	fn map_field_desc(&self, desc: &FieldDescriptorSlice) -> Result<FieldDescriptor> {
		let parsed = desc.parse()?;
		Ok(ParsedFieldDescriptor(self.map_type(&parsed.0)?).write())
	}

	/// Maps a method descriptor to a new one.
	///
	/// The result is written by the descriptor grammar.
	///
	/// Do not implement this yourself.
	fn map_method_desc(&self, desc: &MethodDescriptorSlice) -> Result<MethodDescriptor> {
		let parsed = desc.parse()?;
		let mapped = ParsedMethodDescriptor {
			parameter_descriptors: parsed.parameter_descriptors.iter()
				.map(|t| self.map_type(t))
				.collect::<Result<_>>()?,
			return_descriptor: parsed.return_descriptor.as_ref()
				.map(|t| self.map_type(t))
				.transpose()?,
		};
		Ok(mapped.write())
	}
}

impl ClassRemapper for MappingSet {
	/// Walks the chain of (inner) class mappings. If only some outer classes have mappings, the remaining inner class
	/// names are kept as they are. If the top level class has no mapping, this returns `Ok(None)`.
	fn map_class_fail(&self, class: &ClassNameSlice) -> Result<Option<ClassName>> {
		let (top, inner) = class.split_nesting();

		let Some(mut mapping) = self.get_top_level_class(top) else {
			return Ok(None);
		};

		let mut name = mapping.deobfuscated_name.clone();
		let mut inner = inner.into_iter();
		for simple in inner.by_ref() {
			name.push('$');
			match mapping.get_inner_class(simple) {
				Some(inner_mapping) => {
					name.push_str(&inner_mapping.deobfuscated_name);
					mapping = inner_mapping;
				},
				None => {
					name.push_str(simple);
					break;
				},
			}
		}
		for simple in inner {
			name.push('$');
			name.push_str(simple);
		}

		ClassName::try_from(name)
			.with_context(|| format!("deobfuscated name of class {class} is invalid"))
			.map(Some)
	}
}
