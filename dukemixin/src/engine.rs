//! The resolution engine: walks the classes of a source file, and for every mixin class resolves the linkages of its
//! members against the mapping table.
//!
//! Resolving a linkage has two kinds of results:
//! - new mappings for the members of the mixin class, written into the mixin class's own [`ClassMapping`], and
//! - [`RewriteInstruction`]s for string literals naming members in the obfuscated namespace.
//!
//! Nothing here fails a whole run. Problems with a single declaration end up as [`Diagnostic`]s, and anything that
//! can't be resolved is simply kept as it is.
//!
//! [`ClassMapping`]: quill::tree::mappings::ClassMapping

use std::fmt::Display;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use duke::tree::class::{ClassName, ClassNameSlice};
use duke::tree::descriptor::ParsedFieldDescriptor;
use duke::tree::field::{FieldName, FieldSignature};
use duke::tree::method::{MethodName, MethodSignature};
use quill::inheritance::InheritanceProvider;
use quill::remapper::ClassRemapper;
use quill::tree::mappings::MappingSet;
use crate::annotation::{Annotation, StringLiteral};
use crate::constants;
use crate::declaration::{ClassDecl, FieldDecl, MethodDecl, SourceUnit};
use crate::diagnostic::Diagnostic;
use crate::inflector::AccessorName;
use crate::linkage::{AccessorData, AtData, AtTarget, ClassReference, ImplementsData, InjectData, InterfaceData, Linkage, MemberReference, MixinData, ParsedLiteral, ShadowData};
use crate::planner::{plan_rewrite, write_at_member, RewriteInstruction};

/// The result of remapping: the literals to rewrite, in the order they were found, and the problems encountered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemapOutput {
	pub instructions: Vec<RewriteInstruction>,
	pub diagnostics: Vec<Diagnostic>,
}

/// The outcome of looking something up in the mapping table.
#[derive(Debug, Clone, PartialEq)]
enum Resolved<T> {
	Found(T),
	Missing,
	/// Several candidates with different results, described for the diagnostic.
	Ambiguous(Vec<String>),
}

impl<T> From<Option<T>> for Resolved<T> {
	fn from(value: Option<T>) -> Self {
		match value {
			Some(value) => Resolved::Found(value),
			None => Resolved::Missing,
		}
	}
}

/// Where a linkage is declared, and which classes it targets.
struct Location<'c> {
	class: &'c ClassNameSlice,
	/// The member as `name:desc` or `name(desc)ret`, [`None`] for the class itself.
	member: Option<String>,
	targets: &'c [ClassName],
}

/// Remaps mixin classes against a mapping table.
///
/// The mapping table is borrowed for as long as this lives: mappings derived from one class are visible when
/// remapping the next one. Remap the classes other mixins rely on first, or remap everything more than once.
pub struct MixinRemapper<'m, 'p, P: InheritanceProvider + ?Sized> {
	mappings: &'m mut MappingSet,
	provider: &'p P,
	output: RemapOutput,
}

impl<'m, 'p, P: InheritanceProvider + ?Sized> MixinRemapper<'m, 'p, P> {
	pub fn new(mappings: &'m mut MappingSet, provider: &'p P) -> MixinRemapper<'m, 'p, P> {
		MixinRemapper { mappings, provider, output: RemapOutput::default() }
	}

	/// Remaps all the classes of a source file, and returns what was found for it.
	pub fn remap_unit(&mut self, unit: &SourceUnit) -> RemapOutput {
		let before = std::mem::take(&mut self.output);

		for class in &unit.classes {
			self.remap_class(class);
		}

		let output = std::mem::replace(&mut self.output, before);
		debug!("{}: {} rewrites, {} diagnostics", unit.path.display(), output.instructions.len(), output.diagnostics.len());
		output
	}

	/// Remaps a class and all of its inner classes. The results are collected until [`MixinRemapper::into_output`].
	pub fn remap_class(&mut self, class: &ClassDecl) {
		class.walk(&mut |class| {
			if let Err(e) = self.remap_mixin(class) {
				self.malformed(&class.name, None, e);
			}
		});
	}

	pub fn into_output(self) -> RemapOutput {
		self.output
	}

	fn report(&mut self, diagnostic: Diagnostic) {
		warn!("{diagnostic}");
		self.output.diagnostics.push(diagnostic);
	}

	fn malformed(&mut self, class: &ClassNameSlice, member: Option<String>, error: anyhow::Error) {
		self.report(Diagnostic::MalformedLinkage {
			class: class.to_owned(),
			member,
			message: format!("{error:#}"),
		});
	}

	fn ambiguous(&mut self, location: &Location, literal: &StringLiteral, candidates: Vec<String>) {
		self.report(Diagnostic::AmbiguousOverload {
			class: location.class.to_owned(),
			member: location.member.clone(),
			target: literal.value.clone(),
			span: literal.span,
			candidates,
		});
	}

	fn rewrite(&mut self, literal: &StringLiteral, replacement: String) {
		if let Some(instruction) = plan_rewrite(literal, replacement) {
			trace!("rewriting {:?} at {} to {:?}", instruction.original, instruction.span, instruction.replacement);
			self.output.instructions.push(instruction);
		}
	}

	/// Makes sure the class has a completed mapping, if there's a mapping for it, or the inheritance provider knows it.
	///
	/// Returns `false` if nothing is known about the class.
	fn resolve_class(&mut self, class: &ClassNameSlice) -> Result<bool> {
		if self.mappings.get_class(class).is_none() && self.provider.get_class_info(class)?.is_none() {
			return Ok(false);
		}
		self.mappings.complete(class, self.provider)
			.with_context(|| anyhow!("failed to complete the mapping of {class}"))?;
		Ok(true)
	}

	fn remap_mixin(&mut self, class: &ClassDecl) -> Result<()> {
		let Some(mixin) = MixinData::fetch(class)? else {
			return Ok(());
		};

		self.remap_private_targets(&mixin)?;

		let mut targets = Vec::new();
		for target in mixin.target_names() {
			if self.resolve_class(&target)? {
				targets.push(target);
			} else {
				trace!("{}: nothing known about target {target}", class.name);
			}
		}
		if targets.is_empty() {
			debug!("skipping mixin {}: none of its targets is known", class.name);
			return Ok(());
		}

		let implements = match ImplementsData::fetch(class) {
			Ok(implements) => implements.map(|x| x.interfaces).unwrap_or_default(),
			Err(e) => {
				self.malformed(&class.name, None, e);
				Vec::new()
			},
		};

		for field in &class.fields {
			let location = Location {
				class: &class.name,
				member: Some(field.signature().to_string()),
				targets: &targets,
			};
			self.remap_field(&location, field);
		}

		for method in &class.methods {
			let location = Location {
				class: &class.name,
				member: Some(method.signature().to_string()),
				targets: &targets,
			};
			self.remap_method(&location, method, &implements);
		}

		Ok(())
	}

	/// Rewrites the `targets` strings of `@Mixin` to the deobfuscated class names, in the notation they're written in.
	fn remap_private_targets(&mut self, mixin: &MixinData) -> Result<()> {
		for target in &mixin.private_targets {
			let Some(reference) = &target.parsed else {
				continue;
			};
			let mapped = match self.mappings.find_class_literal(&target.literal.value) {
				Some(mapping) => Some(self.mappings.map_class(&mapping.obfuscated_name)?),
				None => None,
			};
			if let Some(mapped) = mapped {
				self.rewrite(target.literal, reference.write(&mapped));
			}
		}
		Ok(())
	}

	/// Runs the lookup against each target of the mixin. The first target giving a result wins, other targets
	/// disagreeing with it are reported.
	fn across_targets<T: PartialEq + Display>(
		&mut self,
		location: &Location,
		mut f: impl FnMut(&mut MappingSet, &ClassNameSlice) -> Result<Resolved<T>>,
	) -> Result<Resolved<T>> {
		let mut chosen: Option<(T, &ClassName)> = None;
		let mut ambiguous = None;

		for target in location.targets {
			match f(&mut *self.mappings, target.as_slice())? {
				Resolved::Found(found) => match &chosen {
					None => chosen = Some((found, target)),
					Some((first, first_target)) => {
						if *first != found {
							let diagnostic = Diagnostic::ConflictingTargets {
								class: location.class.to_owned(),
								member: location.member.clone(),
								chosen: first.to_string(),
								chosen_target: (*first_target).clone(),
								other: found.to_string(),
								other_target: target.clone(),
							};
							self.report(diagnostic);
						}
					},
				},
				Resolved::Ambiguous(candidates) => {
					ambiguous.get_or_insert(candidates);
				},
				Resolved::Missing => {},
			}
		}

		Ok(match (chosen, ambiguous) {
			(Some((found, _)), _) => Resolved::Found(found),
			(None, Some(candidates)) => Resolved::Ambiguous(candidates),
			(None, None) => Resolved::Missing,
		})
	}

	fn name_field(&mut self, class: &ClassNameSlice, field: &FieldDecl, name: String) -> Result<()> {
		let signature = field.signature();
		let name = FieldName::try_from(name)?;
		trace!("{class}.{signature} -> {name}");
		self.mappings.get_or_create_class(class).get_or_create_field(&signature).deobfuscated_name = name;
		Ok(())
	}

	fn name_method(&mut self, class: &ClassNameSlice, method: &MethodDecl, name: String) -> Result<()> {
		let signature = method.signature();
		let name = MethodName::try_from(name)?;
		trace!("{class}.{signature} -> {name}");
		self.mappings.get_or_create_class(class).get_or_create_method(&signature).deobfuscated_name = name;
		Ok(())
	}

	/// Remaps the linkages of a field. A malformed annotation is reported, and doesn't stop the other ones.
	fn remap_field(&mut self, location: &Location, field: &FieldDecl) {
		for annotation in &field.annotations {
			if let Err(e) = self.remap_field_linkage(location, field, annotation) {
				self.malformed(location.class, location.member.clone(), e);
			}
		}
	}

	fn remap_field_linkage(&mut self, location: &Location, field: &FieldDecl, annotation: &Annotation) -> Result<()> {
		let Some(linkage) = Linkage::of_field(annotation)? else {
			return Ok(());
		};
		match linkage {
			Linkage::ShadowField(shadow) => self.remap_shadow_field(location, field, &shadow),
			other => bail!("{} can't be used on fields", other.annotation_name()),
		}
	}

	/// Remaps the linkages of a method, and the soft implementations of it. Like for fields, each annotation and each
	/// interface is handled on its own.
	fn remap_method(&mut self, location: &Location, method: &MethodDecl, implements: &[InterfaceData]) {
		for annotation in &method.annotations {
			if let Err(e) = self.remap_method_linkage(location, method, annotation) {
				self.malformed(location.class, location.member.clone(), e);
			}
		}

		for interface in implements {
			if let Err(e) = self.remap_soft_implementation(location, method, interface) {
				self.malformed(location.class, location.member.clone(), e);
			}
		}
	}

	fn remap_method_linkage(&mut self, location: &Location, method: &MethodDecl, annotation: &Annotation) -> Result<()> {
		let Some(linkage) = Linkage::of_method(annotation, method)? else {
			return Ok(());
		};
		trace!("{}.{}: {}", location.class, method.signature(), linkage.annotation_name());
		match linkage {
			Linkage::ShadowField(_) => bail!("@Shadow on a method parsed as field shadow"),
			Linkage::ShadowMethod(shadow) => self.remap_shadow_method(location, method, &shadow),
			Linkage::Overwrite => self.remap_overwrite(location, method),
			Linkage::AccessorGetter(data) => self.remap_field_accessor(location, method, &data, true),
			Linkage::AccessorSetter(data) => self.remap_field_accessor(location, method, &data, false),
			Linkage::InvokerProxy(data) => self.remap_invoker(location, method, &data),
			Linkage::InvokerFactory(data) => self.remap_factory(&data),
			Linkage::Inject(data) |
			Linkage::Redirect(data) |
			Linkage::ModifyConstant(data) |
			Linkage::ModifyVariable(data) => self.remap_injector(location, &data),
		}
	}

	fn remap_shadow_field(&mut self, location: &Location, field: &FieldDecl, shadow: &ShadowData) -> Result<()> {
		let stripped = shadow.strip_prefix(field.name.as_str());
		let signature = FieldSignature::new(
			FieldName::try_from(stripped.unwrap_or(field.name.as_str()))?,
			Some(field.desc.clone()),
		);

		let resolved = self.across_targets(location, |mappings, target| {
			Ok(mappings.get_class_mut(target)
				.and_then(|mapping| mapping.compute_field(&signature))
				.map(|field| field.deobfuscated_name.clone())
				.into())
		})?;

		match resolved {
			Resolved::Found(name) => {
				let name = match stripped {
					Some(_) => shadow.prefix(name.as_str()),
					None => name.into_inner(),
				};
				self.name_field(location.class, field, name)
			},
			_ => {
				debug!("{}: no target has a field {signature}", location.class);
				Ok(())
			},
		}
	}

	fn remap_shadow_method(&mut self, location: &Location, method: &MethodDecl, shadow: &ShadowData) -> Result<()> {
		let stripped = shadow.strip_prefix(method.name.as_str());
		let signature = MethodSignature::new(
			MethodName::try_from(stripped.unwrap_or(method.name.as_str()))?,
			method.desc.clone(),
		);

		let resolved = self.find_method(location, &signature)?;

		match resolved {
			Resolved::Found(name) => {
				let name = match stripped {
					Some(_) => shadow.prefix(name.as_str()),
					None => name.into_inner(),
				};
				self.name_method(location.class, method, name)
			},
			_ => {
				debug!("{}: no target has a method {signature}", location.class);
				Ok(())
			},
		}
	}

	fn remap_overwrite(&mut self, location: &Location, method: &MethodDecl) -> Result<()> {
		match self.find_method(location, &method.signature())? {
			Resolved::Found(name) => self.name_method(location.class, method, name.into_inner()),
			_ => {
				debug!("{}: no target has a method {} to overwrite", location.class, method.signature());
				Ok(())
			},
		}
	}

	/// Looks up a method by its exact signature in the targets, giving the deobfuscated name.
	fn find_method(&mut self, location: &Location, signature: &MethodSignature) -> Result<Resolved<MethodName>> {
		self.across_targets(location, |mappings, target| {
			Ok(mappings.get_class(target)
				.and_then(|mapping| mapping.get_method(signature))
				.map(|method| method.deobfuscated_name.clone())
				.into())
		})
	}

	fn remap_field_accessor(&mut self, location: &Location, method: &MethodDecl, data: &AccessorData, is_getter: bool) -> Result<()> {
		let parsed = method.desc.parse()?;
		let field_type = if is_getter {
			parsed.return_descriptor
				.with_context(|| anyhow!("getter {} must not return void", method.name))?
		} else {
			match parsed.parameter_descriptors.as_slice() {
				[field_type] => field_type.clone(),
				other => bail!("setter {} must take exactly one argument, got {}", method.name, other.len()),
			}
		};
		let desc = ParsedFieldDescriptor(field_type).write();

		let mut inflected = None;
		let name = match data.target {
			Some(literal) => match ParsedLiteral::parse(literal, |s| FieldName::try_from(s)).parsed {
				Some(name) => name,
				None => return Ok(()),
			},
			None => {
				let Some(accessor) = AccessorName::of(method.name.as_str()) else {
					debug!("{}: can't get the field name from accessor {}", location.class, method.name);
					return Ok(());
				};
				let name = FieldName::try_from(accessor.name.as_str())?;
				inflected = Some(accessor);
				name
			},
		};
		let signature = FieldSignature::new(name, Some(desc));

		let resolved = self.across_targets(location, |mappings, target| {
			Ok(mappings.get_class_mut(target)
				.and_then(|mapping| mapping.compute_field(&signature))
				.map(|field| field.deobfuscated_name.clone())
				.into())
		})?;
		let Resolved::Found(name) = resolved else {
			debug!("{}: no target has a field {signature}", location.class);
			return Ok(());
		};

		match data.target {
			Some(literal) => {
				self.rewrite(literal, name.into_inner());
				Ok(())
			},
			None => match &inflected {
				Some(accessor) => self.name_method(location.class, method, accessor.prefix(name.as_str())),
				None => Ok(()),
			},
		}
	}

	fn remap_invoker(&mut self, location: &Location, method: &MethodDecl, data: &AccessorData) -> Result<()> {
		let mut inflected = None;
		let name = match data.target {
			Some(literal) => match ParsedLiteral::parse(literal, |s| MethodName::try_from(s)).parsed {
				Some(name) => name,
				None => return Ok(()),
			},
			None => {
				let Some(invoker) = AccessorName::of(method.name.as_str()) else {
					debug!("{}: can't get the method name from invoker {}", location.class, method.name);
					return Ok(());
				};
				let name = MethodName::try_from(invoker.name.as_str())?;
				inflected = Some(invoker);
				name
			},
		};
		let signature = MethodSignature::new(name, method.desc.clone());

		let Resolved::Found(name) = self.find_method(location, &signature)? else {
			debug!("{}: no target has a method {signature}", location.class);
			return Ok(());
		};

		match (data.target, inflected) {
			(Some(literal), _) => {
				self.rewrite(literal, name.into_inner());
				Ok(())
			},
			(None, Some(invoker)) => self.name_method(location.class, method, invoker.prefix(name.as_str())),
			(None, None) => Ok(()),
		}
	}

	/// A static invoker: its target, if any, is a class to construct, or the constructor itself.
	fn remap_factory(&mut self, data: &AccessorData) -> Result<()> {
		let Some(literal) = data.target else {
			return Ok(());
		};
		if literal.value == constants::CONSTRUCTOR_TARGET {
			return Ok(());
		}
		let Some(reference) = ParsedLiteral::parse(literal, ClassReference::parse).parsed else {
			return Ok(());
		};
		if let Some(mapped) = self.mappings.map_class_fail(&reference.name)? {
			self.rewrite(literal, reference.write(&mapped));
		}
		Ok(())
	}

	fn remap_injector(&mut self, location: &Location, data: &InjectData) -> Result<()> {
		for target in &data.methods {
			let Some(member) = &target.parsed else {
				continue;
			};
			let resolved = self.across_targets(location, |mappings, class| resolve_member(mappings, class, member))?;
			match resolved {
				Resolved::Found(member) => self.rewrite(target.literal, member.to_string()),
				Resolved::Ambiguous(candidates) => self.ambiguous(location, target.literal, candidates),
				Resolved::Missing => trace!("{}: keeping target method {:?}", location.class, target.literal.value),
			}
		}

		for at in data.all_at() {
			self.remap_at(location, at)?;
		}

		Ok(())
	}

	fn remap_at(&mut self, location: &Location, at: &AtData) -> Result<()> {
		let Some(target) = &at.target else {
			return Ok(());
		};
		let Some(parsed) = &target.parsed else {
			return Ok(());
		};

		match parsed {
			AtTarget::Class(reference) => {
				if let Some(mapped) = self.mappings.map_class_fail(&reference.name)? {
					self.rewrite(target.literal, reference.write(&mapped));
				}
			},
			AtTarget::Member { owner, member } => {
				if !self.resolve_class(owner)? {
					trace!("{}: keeping @At({}) target {:?}, unknown class", location.class, at.value.unwrap_or(""), target.literal.value);
					return Ok(());
				}
				match resolve_member(&mut *self.mappings, owner, member)? {
					Resolved::Found(member) => {
						let owner = self.mappings.map_class(owner)?;
						self.rewrite(target.literal, write_at_member(&owner, &member));
					},
					Resolved::Ambiguous(candidates) => self.ambiguous(location, target.literal, candidates),
					Resolved::Missing => {
						trace!("{}: keeping @At({}) target {:?}", location.class, at.value.unwrap_or(""), target.literal.value);
					},
				}
			},
		}
		Ok(())
	}

	/// Methods with the prefix of a soft implemented interface get the deobfuscated name of the interface method.
	fn remap_soft_implementation(&mut self, location: &Location, method: &MethodDecl, interface: &InterfaceData) -> Result<()> {
		if interface.prefix.is_empty() {
			return Ok(());
		}
		let Some(stripped) = method.name.as_str().strip_prefix(interface.prefix).filter(|x| !x.is_empty()) else {
			return Ok(());
		};
		if !self.resolve_class(interface.iface)? {
			return Ok(());
		}

		let signature = MethodSignature::new(MethodName::try_from(stripped)?, method.desc.clone());
		let name = self.mappings.get_class(interface.iface)
			.and_then(|mapping| mapping.get_method(&signature))
			.map(|method| method.deobfuscated_name.clone());

		match name {
			Some(name) => self.name_method(location.class, method, format!("{}{name}", interface.prefix)),
			None => {
				debug!("{}: interface {} has no method {signature}", location.class, interface.iface);
				Ok(())
			},
		}
	}
}

/// Resolves a member reference against the mapping of a class, giving the same reference in the deobfuscated
/// namespace.
///
/// Only a name matches all methods with that name, and gives a result only if all of them have the same
/// deobfuscated name. References with a field type only match a field of that type.
fn resolve_member(mappings: &mut MappingSet, owner: &ClassNameSlice, member: &MemberReference) -> Result<Resolved<MemberReference>> {
	match member {
		MemberReference::Name(name) => {
			let Some(mapping) = mappings.get_class(owner) else {
				return Ok(Resolved::Missing);
			};
			let candidates: Vec<_> = mapping.methods_named(name).collect();
			let Some(first) = candidates.first() else {
				return Ok(Resolved::Missing);
			};
			if candidates.iter().all(|method| method.deobfuscated_name == first.deobfuscated_name) {
				Ok(Resolved::Found(MemberReference::Name(first.deobfuscated_name.clone())))
			} else {
				Ok(Resolved::Ambiguous(candidates.iter()
					.map(|method| format!("{} -> {}", method.obfuscated, method.deobfuscated_name))
					.collect()))
			}
		},
		MemberReference::Method(signature) => {
			let Some(name) = mappings.get_class(owner)
				.and_then(|mapping| mapping.get_method(signature))
				.map(|method| method.deobfuscated_name.clone()) else {
				return Ok(Resolved::Missing);
			};
			let desc = mappings.map_method_desc(&signature.desc)?;
			Ok(Resolved::Found(MemberReference::Method(MethodSignature::new(name, desc))))
		},
		MemberReference::Field(signature) => {
			let Some(name) = mappings.get_class_mut(owner)
				.and_then(|mapping| mapping.compute_field(signature))
				.filter(|field| field.obfuscated.desc.is_none() || field.obfuscated.desc == signature.desc)
				.map(|field| field.deobfuscated_name.clone()) else {
				return Ok(Resolved::Missing);
			};
			let desc = signature.desc.as_ref()
				.map(|desc| mappings.map_field_desc(desc))
				.transpose()?;
			Ok(Resolved::Found(MemberReference::Field(FieldSignature::new(name, desc))))
		},
	}
}
