//! Keeping `@Final` and `@Mutable` on `@Shadow` fields consistent with the target fields.
//!
//! A shadow of a final field needs `@Final` (or `@Mutable`, if the mixin assigns it). A shadow of a field that isn't
//! final needs neither.

use anyhow::{anyhow, Context, Result};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use duke::tree::class::{ClassName, ClassNameSlice};
use duke::tree::field::FieldName;
use quill::inheritance::{ancestors_of, FieldInfo, InheritanceProvider};
use crate::annotation::Span;
use crate::constants;
use crate::declaration::{ClassDecl, FieldDecl, SourceUnit};
use crate::diagnostic::Diagnostic;
use crate::linkage::{MixinData, ShadowData};

/// A change to the source code of a mixin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CleanerEdit {
	/// Insert the annotation `text` right after the annotation at `after`.
	InsertAnnotation {
		after: Span,
		text: String,
	},
	RemoveAnnotation {
		span: Span,
		/// The binary name of the removed annotation.
		annotation: String,
	},
	/// Make sure the class is imported.
	AddImport {
		class: String,
	},
}

/// The edits for a source file, and the declarations that couldn't be cleaned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanOutput {
	pub edits: Vec<CleanerEdit>,
	pub diagnostics: Vec<Diagnostic>,
}

impl CleanOutput {
	fn malformed(&mut self, class: &ClassNameSlice, member: Option<String>, error: anyhow::Error) {
		let diagnostic = Diagnostic::MalformedLinkage { class: class.to_owned(), member, message: format!("{error:#}") };
		warn!("{diagnostic}");
		self.diagnostics.push(diagnostic);
	}
}

/// Cleans all the mixin classes of a source file, including inner classes.
pub fn clean_unit(unit: &SourceUnit, provider: &(impl InheritanceProvider + ?Sized)) -> CleanOutput {
	let mut output = CleanOutput::default();
	for class in &unit.classes {
		class.walk(&mut |class| {
			let cleaned = clean_class(class, provider);
			output.edits.extend(cleaned.edits);
			output.diagnostics.extend(cleaned.diagnostics);
		});
	}
	output
}

/// Cleans the `@Shadow` fields of a mixin class, using its first target. Inner classes are not visited.
///
/// A field that can't be cleaned is reported, and the other fields are still cleaned.
pub fn clean_class(class: &ClassDecl, provider: &(impl InheritanceProvider + ?Sized)) -> CleanOutput {
	let mut output = CleanOutput::default();

	let target = match first_known_target(class, provider) {
		Ok(Some(target)) => target,
		Ok(None) => return output,
		Err(e) => {
			output.malformed(&class.name, None, e);
			return output;
		},
	};

	let mut import = false;
	for field in &class.fields {
		match clean_field(provider, &class.name, &target, field, &mut output.edits) {
			Ok(added_final) => import |= added_final,
			Err(e) => output.malformed(&class.name, Some(field.signature().to_string()), e),
		}
	}

	if import {
		output.edits.push(CleanerEdit::AddImport { class: constants::FINAL.to_owned() });
	}

	output
}

fn first_known_target(class: &ClassDecl, provider: &(impl InheritanceProvider + ?Sized)) -> Result<Option<ClassName>> {
	let Some(mixin) = MixinData::fetch(class)? else {
		return Ok(None);
	};
	let Some(target) = mixin.target_names().into_iter().next() else {
		return Ok(None);
	};
	if provider.get_class_info(&target)?.is_none() {
		debug!("not cleaning {}: nothing known about {target}", class.name);
		return Ok(None);
	}
	Ok(Some(target))
}

/// Cleans a single field, returning whether `@Final` was added to it.
fn clean_field(
	provider: &(impl InheritanceProvider + ?Sized),
	class: &ClassNameSlice,
	target: &ClassNameSlice,
	field: &FieldDecl,
	edits: &mut Vec<CleanerEdit>,
) -> Result<bool> {
	let Some(shadow) = field.annotation(constants::SHADOW) else {
		return Ok(false);
	};
	let shadow_data = ShadowData::from(shadow)
		.with_context(|| anyhow!("failed to read @Shadow of {class}.{}", field.name))?;

	let name = match shadow_data.strip_prefix(field.name.as_str()) {
		Some(stripped) => FieldName::try_from(stripped)?,
		None => field.name.clone(),
	};
	let Some(info) = find_field(provider, target, &name, field)? else {
		trace!("{class}: no field {name} in {target} or its super classes");
		return Ok(false);
	};

	let is_final = field.annotation(constants::FINAL);
	let is_mutable = field.annotation(constants::MUTABLE);

	if info.is_final {
		if is_final.is_none() && is_mutable.is_none() {
			trace!("{class}.{}: adding @Final", field.name);
			edits.push(CleanerEdit::InsertAnnotation { after: shadow.span, text: "@Final".to_owned() });
			return Ok(true);
		}
	} else {
		for annotation in is_final.into_iter().chain(is_mutable) {
			trace!("{class}.{}: removing @{}", field.name, annotation.simple_name());
			edits.push(CleanerEdit::RemoveAnnotation { span: annotation.span, annotation: annotation.name.clone() });
		}
	}
	Ok(false)
}

/// Finds the field in the class, or, if it's not declared there, in the nearest super class declaring a non private
/// field with that name.
fn find_field<'a>(
	provider: &'a (impl InheritanceProvider + ?Sized),
	class: &ClassNameSlice,
	name: &FieldName,
	field: &FieldDecl,
) -> Result<Option<&'a FieldInfo>> {
	let matches = |info: &FieldInfo| info.name == *name && info.desc == field.desc;

	if let Some(info) = provider.get_class_info(class)? {
		if let Some(found) = info.fields.iter().find(|x| matches(*x)) {
			return Ok(Some(found));
		}
	}

	for ancestor in ancestors_of(provider, class)? {
		if let Some(info) = provider.get_class_info(&ancestor)? {
			if let Some(found) = info.fields.iter().find(|x| !x.is_private && matches(*x)) {
				return Ok(Some(found));
			}
		}
	}

	Ok(None)
}
