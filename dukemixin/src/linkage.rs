//! Parsing of the mixin annotations into [`Linkage`]s.
//!
//! Each annotation kind has its own data type here, holding references into the [`Annotation`] it was parsed from, so
//! that the string literals can be rewritten later.
//!
//! Annotations of the wrong shape (like a number where a string is expected) give an error. String literals that
//! can't be parsed aren't errors: they're kept in a [`ParsedLiteral`] without parse result, and are never rewritten,
//! as they might refer to something that simply has no mapping.

use std::fmt::{Display, Formatter};
use anyhow::{anyhow, bail, Context, Result};
use log::debug;
use duke::tree::class::{ClassName, ClassNameSlice};
use duke::tree::field::{FieldDescriptor, FieldName, FieldSignature};
use duke::tree::method::{MethodDescriptor, MethodName, MethodSignature};
use crate::annotation::{Annotation, StringLiteral};
use crate::constants;
use crate::declaration::{ClassDecl, MethodDecl};

/// How a class name is written in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassNotation {
	/// `a/b/C`
	Internal,
	/// `a.b.C`, also used for names without a package
	Dotted,
	/// `La/b/C;`
	Descriptor,
}

/// A class name in a string, together with the notation used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassReference {
	pub name: ClassName,
	pub notation: ClassNotation,
}

impl ClassReference {
	/// Parses a class name in either the internal or the dotted notation.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use dukemixin::linkage::{ClassNotation, ClassReference};
	///
	/// let reference = ClassReference::parse("a.b.C").unwrap();
	/// assert_eq!((reference.name.as_str(), reference.notation), ("a/b/C", ClassNotation::Dotted));
	///
	/// let reference = ClassReference::parse("a/b/C").unwrap();
	/// assert_eq!((reference.name.as_str(), reference.notation), ("a/b/C", ClassNotation::Internal));
	/// ```
	pub fn parse(s: &str) -> Result<ClassReference> {
		if s.contains('/') {
			Ok(ClassReference { name: ClassName::try_from(s)?, notation: ClassNotation::Internal })
		} else {
			Ok(ClassReference { name: ClassName::from_dotted(s)?, notation: ClassNotation::Dotted })
		}
	}

	/// Writes some class name in the notation of this reference.
	pub fn write(&self, name: &ClassNameSlice) -> String {
		match self.notation {
			ClassNotation::Internal => name.as_str().to_owned(),
			ClassNotation::Dotted => name.to_dotted(),
			ClassNotation::Descriptor => format!("L{name};"),
		}
	}
}

/// A reference to a member, as used for the targets of injectors: `name`, `name(desc)ret` or `name:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberReference {
	/// Only a name, probably of a method.
	Name(MethodName),
	Method(MethodSignature),
	/// A field, always with descriptor.
	Field(FieldSignature),
}

impl MemberReference {
	/// Splits at the first `(` for a method descriptor, otherwise at the first `:` for a field descriptor.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use dukemixin::linkage::MemberReference;
	///
	/// assert!(matches!(MemberReference::parse("hhj").unwrap(), MemberReference::Name(_)));
	/// assert!(matches!(MemberReference::parse("hhj()V").unwrap(), MemberReference::Method(_)));
	/// assert!(matches!(MemberReference::parse("yu:I").unwrap(), MemberReference::Field(_)));
	/// assert!(MemberReference::parse("hhj(").is_err());
	/// ```
	pub fn parse(s: &str) -> Result<MemberReference> {
		if let Some(index) = s.find('(') {
			let (name, desc) = s.split_at(index);
			Ok(MemberReference::Method(MethodSignature::new(MethodName::try_from(name)?, MethodDescriptor::try_from(desc)?)))
		} else if let Some((name, desc)) = s.split_once(':') {
			Ok(MemberReference::Field(FieldSignature::new(FieldName::try_from(name)?, Some(FieldDescriptor::try_from(desc)?))))
		} else {
			Ok(MemberReference::Name(MethodName::try_from(s)?))
		}
	}

	pub fn name(&self) -> &str {
		match self {
			MemberReference::Name(name) => name.as_str(),
			MemberReference::Method(signature) => signature.name.as_str(),
			MemberReference::Field(signature) => signature.name.as_str(),
		}
	}
}

impl Display for MemberReference {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			MemberReference::Name(name) => write!(f, "{name}"),
			MemberReference::Method(signature) => write!(f, "{signature}"),
			MemberReference::Field(signature) => write!(f, "{signature}"),
		}
	}
}

/// The `target` of an `@At`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtTarget {
	/// Just a class, for example for `NEW` injection points: `hj`, `a/b/C`, `a.b.C` or `La/b/C;`.
	Class(ClassReference),
	/// A member of a class: `La/b/C;name(desc)ret`, `La/b/C;name:desc` or `La/b/C;name`.
	Member {
		owner: ClassName,
		member: MemberReference,
	},
}

impl AtTarget {
	/// Splits at the first `;`. If there's no `;`, the whole string is a class name.
	pub fn parse(s: &str) -> Result<AtTarget> {
		let Some(semi) = s.find(';') else {
			return Ok(AtTarget::Class(ClassReference::parse(s)?));
		};

		let Some(owner) = s[..semi].strip_prefix('L') else {
			bail!("expected the class of {s:?} to be given as `L<class>;`");
		};
		let owner = ClassName::try_from(owner)?;

		let member = &s[semi + 1..];
		if member.is_empty() {
			Ok(AtTarget::Class(ClassReference { name: owner, notation: ClassNotation::Descriptor }))
		} else {
			Ok(AtTarget::Member { owner, member: MemberReference::parse(member)? })
		}
	}
}

/// A string literal, and the value parsed from it. If parsing failed, there's no value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLiteral<'a, T> {
	pub literal: &'a StringLiteral,
	pub parsed: Option<T>,
}

impl<'a, T> ParsedLiteral<'a, T> {
	pub(crate) fn parse(literal: &'a StringLiteral, f: impl FnOnce(&str) -> Result<T>) -> ParsedLiteral<'a, T> {
		let parsed = match f(&literal.value) {
			Ok(parsed) => Some(parsed),
			Err(e) => {
				debug!("keeping {:?} at {} as it is: {e:#}", literal.value, literal.span);
				None
			},
		};
		ParsedLiteral { literal, parsed }
	}
}

/// Data of `@Shadow(prefix = "...")`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowData<'a> {
	pub prefix: &'a str,
}

impl<'a> ShadowData<'a> {
	pub fn from(annotation: &'a Annotation) -> Result<ShadowData<'a>> {
		annotation.check_elements(&["prefix", "remap", "aliases"])?;
		let prefix = annotation.get_string("prefix")?
			.map_or(constants::DEFAULT_SHADOW_PREFIX, |literal| literal.value.as_str());
		Ok(ShadowData { prefix })
	}

	/// Removes the prefix from a member name, if the member name uses it.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use dukemixin::linkage::ShadowData;
	///
	/// let shadow = ShadowData { prefix: "shadow$" };
	/// assert_eq!(shadow.strip_prefix("shadow$yu"), Some("yu"));
	/// assert_eq!(shadow.strip_prefix("yu"), None);
	/// assert_eq!(shadow.strip_prefix("shadow$"), None);
	/// ```
	pub fn strip_prefix<'n>(&self, name: &'n str) -> Option<&'n str> {
		name.strip_prefix(self.prefix).filter(|rest| !rest.is_empty())
	}

	/// Adds the prefix in front of a name, the names of shadow members aren't inflected.
	pub fn prefix(&self, name: &str) -> String {
		format!("{}{name}", self.prefix)
	}
}

/// The kinds of `@Accessor` and `@Invoker` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorType {
	/// Takes no arguments and returns the field value.
	FieldGetter,
	/// Takes the new field value and returns `void`.
	FieldSetter,
	/// Calls a method.
	MethodProxy,
	/// Calls a constructor, always `static`.
	ObjectFactory,
}

impl AccessorType {
	pub const ALL: [AccessorType; 4] = [
		AccessorType::FieldGetter,
		AccessorType::FieldSetter,
		AccessorType::MethodProxy,
		AccessorType::ObjectFactory,
	];

	/// The method name prefixes that are inflected for this kind.
	pub fn prefixes(&self) -> &'static [&'static str] {
		match self {
			AccessorType::FieldGetter => &["get", "is"],
			AccessorType::FieldSetter => &["set"],
			AccessorType::MethodProxy => &["call", "invoke"],
			AccessorType::ObjectFactory => &["new", "create"],
		}
	}

	/// Finds the kind from the annotation used and the shape of the method.
	pub fn of(is_invoker: bool, method: &MethodDecl) -> Result<AccessorType> {
		if is_invoker {
			if method.is_static {
				Ok(AccessorType::ObjectFactory)
			} else {
				Ok(AccessorType::MethodProxy)
			}
		} else if method.desc.parse()?.return_descriptor.is_none() {
			Ok(AccessorType::FieldSetter)
		} else {
			Ok(AccessorType::FieldGetter)
		}
	}
}

/// Data of `@Accessor("...")` and `@Invoker("...")`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorData<'a> {
	/// The explicit target, [`None`] if the name of the accessor method is to be inflected.
	pub target: Option<&'a StringLiteral>,
}

impl<'a> AccessorData<'a> {
	pub fn from(annotation: &'a Annotation) -> Result<AccessorData<'a>> {
		annotation.check_elements(&["value", "remap"])?;
		let target = annotation.get_string("value")?
			.filter(|literal| !literal.value.is_empty());
		Ok(AccessorData { target })
	}
}

/// Data of `@At(value = "...", target = "...")`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtData<'a> {
	/// The injection point, like `HEAD` or `INVOKE`.
	pub value: Option<&'a str>,
	pub target: Option<ParsedLiteral<'a, AtTarget>>,
}

impl<'a> AtData<'a> {
	pub fn from(annotation: &'a Annotation) -> Result<AtData<'a>> {
		if !annotation.is(constants::AT) {
			bail!("expected an @At annotation, got @{}", annotation.simple_name());
		}
		let value = annotation.get_string("value")?.map(|literal| literal.value.as_str());
		let target = annotation.get_string("target")?
			.map(|literal| ParsedLiteral::parse(literal, AtTarget::parse));
		Ok(AtData { value, target })
	}
}

/// Data of `@Slice(from = @At(...), to = @At(...))`.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceData<'a> {
	pub from: Option<AtData<'a>>,
	pub to: Option<AtData<'a>>,
}

impl<'a> SliceData<'a> {
	pub fn from(annotation: &'a Annotation) -> Result<SliceData<'a>> {
		if !annotation.is(constants::SLICE) {
			bail!("expected a @Slice annotation, got @{}", annotation.simple_name());
		}
		let from = annotation.get_annotation("from")?.map(AtData::from).transpose()?;
		let to = annotation.get_annotation("to")?.map(AtData::from).transpose()?;
		Ok(SliceData { from, to })
	}
}

/// Data of `@Inject`, `@Redirect`, `@ModifyConstant` and `@ModifyVariable`: the target methods, the injection points
/// and the slices.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectData<'a> {
	pub methods: Vec<ParsedLiteral<'a, MemberReference>>,
	pub at: Vec<AtData<'a>>,
	pub slices: Vec<SliceData<'a>>,
}

impl<'a> InjectData<'a> {
	pub fn from(annotation: &'a Annotation) -> Result<InjectData<'a>> {
		let methods = annotation.get_strings("method")?.into_iter()
			.map(|literal| ParsedLiteral::parse(literal, MemberReference::parse))
			.collect();
		let at = annotation.get_annotations("at")?.into_iter()
			.map(AtData::from)
			.collect::<Result<_>>()?;
		let slices = annotation.get_annotations("slice")?.into_iter()
			.map(SliceData::from)
			.collect::<Result<_>>()?;
		Ok(InjectData { methods, at, slices })
	}

	/// All the `@At`s, including the ones bounding the slices.
	pub fn all_at(&self) -> impl Iterator<Item=&AtData<'a>> {
		self.at.iter()
			.chain(self.slices.iter().flat_map(|slice| slice.from.iter().chain(slice.to.iter())))
	}
}

/// Data of `@Mixin(value = {...}, targets = {"..."})`.
#[derive(Debug, Clone, PartialEq)]
pub struct MixinData<'a> {
	/// The targets given as class literals.
	pub targets: Vec<&'a ClassNameSlice>,
	/// The targets given as strings, usually because they aren't accessible.
	pub private_targets: Vec<ParsedLiteral<'a, ClassReference>>,
}

impl<'a> MixinData<'a> {
	/// Gets the data of the `@Mixin` annotation of the class, if there's one.
	pub fn fetch(class: &'a ClassDecl) -> Result<Option<MixinData<'a>>> {
		class.annotation(constants::MIXIN)
			.map(MixinData::from)
			.transpose()
			.with_context(|| anyhow!("failed to read @Mixin of {}", class.name))
	}

	pub fn from(annotation: &'a Annotation) -> Result<MixinData<'a>> {
		let targets = annotation.get_classes("value")?;
		let private_targets = annotation.get_strings("targets")?.into_iter()
			.map(|literal| ParsedLiteral::parse(literal, ClassReference::parse))
			.collect();
		Ok(MixinData { targets, private_targets })
	}

	/// All target names: first the class literals, then the strings.
	pub fn target_names(&self) -> Vec<ClassName> {
		self.targets.iter()
			.map(|&name| name.to_owned())
			.chain(self.private_targets.iter()
				.filter_map(|target| target.parsed.as_ref())
				.map(|reference| reference.name.clone()))
			.collect()
	}
}

/// Data of an `@Interface(iface = X.class, prefix = "...")` inside of `@Implements`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceData<'a> {
	pub iface: &'a ClassNameSlice,
	pub prefix: &'a str,
}

impl<'a> InterfaceData<'a> {
	pub fn from(annotation: &'a Annotation) -> Result<InterfaceData<'a>> {
		if !annotation.is(constants::INTERFACE) {
			bail!("expected an @Interface annotation, got @{}", annotation.simple_name());
		}
		let iface = annotation.get("iface")
			.and_then(|value| value.as_class())
			.with_context(|| anyhow!("@Interface needs a class literal as `iface`"))?;
		let prefix = annotation.get_string("prefix")?
			.map_or("", |literal| literal.value.as_str());
		Ok(InterfaceData { iface, prefix })
	}
}

/// Data of `@Implements(...)`, the soft implemented interfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplementsData<'a> {
	pub interfaces: Vec<InterfaceData<'a>>,
}

impl<'a> ImplementsData<'a> {
	pub fn fetch(class: &'a ClassDecl) -> Result<Option<ImplementsData<'a>>> {
		class.annotation(constants::IMPLEMENTS)
			.map(ImplementsData::from)
			.transpose()
			.with_context(|| anyhow!("failed to read @Implements of {}", class.name))
	}

	pub fn from(annotation: &'a Annotation) -> Result<ImplementsData<'a>> {
		let interfaces = annotation.get_annotations("value")?.into_iter()
			.map(InterfaceData::from)
			.collect::<Result<_>>()?;
		Ok(ImplementsData { interfaces })
	}
}

/// A linkage of a member of a mixin class to a member of the target class.
#[derive(Debug, Clone, PartialEq)]
pub enum Linkage<'a> {
	ShadowField(ShadowData<'a>),
	ShadowMethod(ShadowData<'a>),
	Overwrite,
	AccessorGetter(AccessorData<'a>),
	AccessorSetter(AccessorData<'a>),
	InvokerProxy(AccessorData<'a>),
	InvokerFactory(AccessorData<'a>),
	Inject(InjectData<'a>),
	Redirect(InjectData<'a>),
	ModifyConstant(InjectData<'a>),
	ModifyVariable(InjectData<'a>),
}

impl<'a> Linkage<'a> {
	/// Parses an annotation of a field. Annotations not making a linkage give [`None`].
	pub fn of_field(annotation: &'a Annotation) -> Result<Option<Linkage<'a>>> {
		if annotation.is(constants::SHADOW) {
			Ok(Some(Linkage::ShadowField(ShadowData::from(annotation)?)))
		} else {
			Ok(None)
		}
	}

	/// Parses an annotation of a method. Annotations not making a linkage give [`None`].
	pub fn of_method(annotation: &'a Annotation, method: &MethodDecl) -> Result<Option<Linkage<'a>>> {
		let linkage = match annotation.name.as_str() {
			constants::SHADOW => Linkage::ShadowMethod(ShadowData::from(annotation)?),
			constants::OVERWRITE => Linkage::Overwrite,
			constants::ACCESSOR | constants::INVOKER => {
				let data = AccessorData::from(annotation)?;
				match AccessorType::of(annotation.is(constants::INVOKER), method)? {
					AccessorType::FieldGetter => Linkage::AccessorGetter(data),
					AccessorType::FieldSetter => Linkage::AccessorSetter(data),
					AccessorType::MethodProxy => Linkage::InvokerProxy(data),
					AccessorType::ObjectFactory => Linkage::InvokerFactory(data),
				}
			},
			constants::INJECT => Linkage::Inject(InjectData::from(annotation)?),
			constants::REDIRECT => Linkage::Redirect(InjectData::from(annotation)?),
			constants::MODIFY_CONSTANT => Linkage::ModifyConstant(InjectData::from(annotation)?),
			constants::MODIFY_VARIABLE => Linkage::ModifyVariable(InjectData::from(annotation)?),
			_ => return Ok(None),
		};
		Ok(Some(linkage))
	}

	/// The annotation this came from, for messages.
	pub fn annotation_name(&self) -> &'static str {
		match self {
			Linkage::ShadowField(_) | Linkage::ShadowMethod(_) => "@Shadow",
			Linkage::Overwrite => "@Overwrite",
			Linkage::AccessorGetter(_) | Linkage::AccessorSetter(_) => "@Accessor",
			Linkage::InvokerProxy(_) | Linkage::InvokerFactory(_) => "@Invoker",
			Linkage::Inject(_) => "@Inject",
			Linkage::Redirect(_) => "@Redirect",
			Linkage::ModifyConstant(_) => "@ModifyConstant",
			Linkage::ModifyVariable(_) => "@ModifyVariable",
		}
	}
}
