use anyhow::{bail, Result};
use indexmap::IndexMap;
use duke::tree::class::{ClassName, ClassNameSlice};
use duke::tree::field::{FieldName, FieldNameSlice, FieldSignature};
use duke::tree::method::{MethodName, MethodNameSlice, MethodSignature};
use crate::tree::names::Namespaces;

/// The mapping table: a tree of class mappings, each owning its fields, methods and inner classes.
///
/// Only top level classes are stored in [`MappingSet::classes`], inner classes are reached through their outer
/// class. Mappings are never removed.
#[derive(Debug, Clone, Default)]
pub struct MappingSet {
	pub namespaces: Namespaces,
	pub classes: IndexMap<ClassName, ClassMapping>,
}

impl MappingSet {
	pub fn new() -> MappingSet {
		MappingSet::default()
	}

	pub fn with_namespaces(namespaces: Namespaces) -> MappingSet {
		MappingSet { namespaces, classes: IndexMap::new() }
	}

	/// Gets the mapping for a class, creating it and all the mappings of enclosing classes if they don't exist.
	///
	/// Newly created mappings keep the obfuscated name.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use quill::tree::mappings::MappingSet;
	///
	/// let mut mappings = MappingSet::new();
	/// let name = ClassName::try_from("hj$a").unwrap();
	/// mappings.get_or_create_class(&name).deobfuscated_name = "Inner".to_owned();
	///
	/// assert_eq!(mappings.classes.len(), 1);
	/// assert_eq!(mappings.get_class(&name).unwrap().deobfuscated_name, "Inner");
	/// ```
	pub fn get_or_create_class(&mut self, name: &ClassNameSlice) -> &mut ClassMapping {
		let (top, inner) = name.split_nesting();

		let mut class = self.classes.entry(top.to_owned())
			.or_insert_with(|| ClassMapping::new(top.to_owned(), top.as_str().to_owned()));

		let mut end = top.as_str().len();
		for simple in inner {
			end += 1 + simple.len();
			// SAFETY: Any prefix of a class name ending right before an inner class `$`, or at the end, is a valid class name.
			let full = unsafe { ClassNameSlice::from_inner_unchecked(&name.as_str()[..end]) };

			class = class.inner_classes.entry(simple.to_owned())
				.or_insert_with(|| ClassMapping::new(full.to_owned(), simple.to_owned()));
		}

		class
	}

	/// Gets the mapping of a top level class by its full obfuscated name.
	///
	/// Inner class names are looked up as if they were top level, so this doesn't find the mapping for `a$b`
	/// stored inside of `a`.
	pub fn get_top_level_class(&self, name: &ClassNameSlice) -> Option<&ClassMapping> {
		self.classes.get(name)
	}

	/// Gets the mapping of any class, walking into inner classes.
	pub fn get_class(&self, name: &ClassNameSlice) -> Option<&ClassMapping> {
		let (top, inner) = name.split_nesting();

		let mut class = self.classes.get(top)?;
		for simple in inner {
			class = class.inner_classes.get(simple)?;
		}
		Some(class)
	}

	pub fn get_class_mut(&mut self, name: &ClassNameSlice) -> Option<&mut ClassMapping> {
		let (top, inner) = name.split_nesting();

		let mut class = self.classes.get_mut(top)?;
		for simple in inner {
			class = class.inner_classes.get_mut(simple)?;
		}
		Some(class)
	}

	/// Finds a class mapping by a class name as written in source code, with either dots or slashes.
	///
	/// First tries the top level lookup, then the full lookup into inner classes.
	pub fn find_class_literal(&self, literal: &str) -> Option<&ClassMapping> {
		let name = ClassName::from_dotted(literal).ok()?;
		self.get_top_level_class(&name)
			.or_else(|| self.get_class(&name))
	}

	/// Iterates over all class mappings, the inner ones directly after their outer class.
	pub fn all_classes(&self) -> impl Iterator<Item=&ClassMapping> {
		let mut stack: Vec<&ClassMapping> = self.classes.values().rev().collect();
		std::iter::from_fn(move || {
			let class = stack.pop()?;
			stack.extend(class.inner_classes.values().rev());
			Some(class)
		})
	}
}

/// The mapping of a class.
#[derive(Debug, Clone)]
pub struct ClassMapping {
	/// The full obfuscated name, for inner classes including the outer class.
	pub obfuscated_name: ClassName,
	/// The deobfuscated name. For top level classes this is the full name, for inner classes just the part after
	/// the last `$`.
	///
	/// The full deobfuscated name of an inner class is obtained by remapping, see
	/// [`ClassRemapper`][crate::remapper::ClassRemapper].
	pub deobfuscated_name: String,
	pub fields: IndexMap<FieldSignature, FieldMapping>,
	pub methods: IndexMap<MethodSignature, MethodMapping>,
	/// The inner classes, keyed by their obfuscated name after the last `$`.
	pub inner_classes: IndexMap<String, ClassMapping>,
	pub(crate) completed: bool,
}

impl ClassMapping {
	pub(crate) fn new(obfuscated_name: ClassName, deobfuscated_name: String) -> ClassMapping {
		ClassMapping {
			obfuscated_name,
			deobfuscated_name,
			fields: IndexMap::new(),
			methods: IndexMap::new(),
			inner_classes: IndexMap::new(),
			completed: false,
		}
	}

	/// The obfuscated name as stored in [`ClassMapping::deobfuscated_name`], so for inner classes only the
	/// last part.
	pub fn obfuscated_simple_name(&self) -> &str {
		match self.obfuscated_name.split_nesting().1.last() {
			Some(simple) => simple,
			None => self.obfuscated_name.as_str(),
		}
	}

	pub fn has_deobfuscated_name(&self) -> bool {
		self.deobfuscated_name != self.obfuscated_simple_name()
	}

	/// Sets the deobfuscated name, which must be a full name for top level classes and a single name for inner classes.
	pub fn set_deobfuscated_name(&mut self, name: &str) -> Result<()> {
		if self.obfuscated_name.is_inner_class() {
			if name.is_empty() || name.contains(['$', '/', '.', ';', '[']) {
				bail!("invalid deobfuscated name {name:?} for inner class {}", self.obfuscated_name);
			}
		} else {
			ClassName::check_valid(name)?;
		}
		self.deobfuscated_name = name.to_owned();
		Ok(())
	}

	/// Looks up a field by its exact signature.
	pub fn get_field(&self, signature: &FieldSignature) -> Option<&FieldMapping> {
		self.fields.get(signature)
	}

	/// Looks up a field, accepting partial information.
	///
	/// A signature without descriptor matches the first field with that name. A signature with descriptor first
	/// tries the exact match, then a descriptor-less mapping of that name (which gets copied into a mapping with
	/// the full signature), and lastly the only field with that name, if there's exactly one.
	pub fn compute_field(&mut self, signature: &FieldSignature) -> Option<&FieldMapping> {
		if signature.desc.is_none() {
			return self.fields.values().find(|field| field.obfuscated.name == signature.name);
		}

		if let Some(index) = self.fields.get_index_of(signature) {
			return self.fields.get_index(index).map(|(_, field)| field);
		}

		if let Some(deobfuscated_name) = self.fields.get(&signature.without_desc()).map(|field| field.deobfuscated_name.clone()) {
			let field = FieldMapping { obfuscated: signature.clone(), deobfuscated_name };
			let (index, _) = self.fields.insert_full(signature.clone(), field);
			return self.fields.get_index(index).map(|(_, field)| field);
		}

		let mut named = self.fields.values().filter(|field| field.obfuscated.name == signature.name);
		match (named.next(), named.next()) {
			(Some(only), None) => Some(only),
			_ => None,
		}
	}

	/// Gets the mapping of a field, inserting one that keeps the obfuscated name if there's none.
	pub fn get_or_create_field(&mut self, signature: &FieldSignature) -> &mut FieldMapping {
		self.fields.entry(signature.clone())
			.or_insert_with(|| FieldMapping::identity(signature.clone()))
	}

	pub fn fields_named<'a>(&'a self, name: &'a FieldNameSlice) -> impl Iterator<Item=&'a FieldMapping> + 'a {
		self.fields.values().filter(move |field| field.obfuscated.name == name)
	}

	/// Looks up a method by its exact signature.
	pub fn get_method(&self, signature: &MethodSignature) -> Option<&MethodMapping> {
		self.methods.get(signature)
	}

	/// Looks up a method.
	///
	/// Unlike [`ClassMapping::compute_field`] this has no fallback: overloads can only be told apart by their
	/// descriptor. Use [`ClassMapping::methods_named`] to get all the candidates for a name.
	pub fn compute_method(&self, signature: &MethodSignature) -> Option<&MethodMapping> {
		self.get_method(signature)
	}

	/// Gets the mapping of a method, inserting one that keeps the obfuscated name if there's none.
	pub fn get_or_create_method(&mut self, signature: &MethodSignature) -> &mut MethodMapping {
		self.methods.entry(signature.clone())
			.or_insert_with(|| MethodMapping::identity(signature.clone()))
	}

	pub fn methods_named<'a>(&'a self, name: &'a MethodNameSlice) -> impl Iterator<Item=&'a MethodMapping> + 'a {
		self.methods.values().filter(move |method| method.obfuscated.name == name)
	}

	pub fn get_inner_class(&self, simple_name: &str) -> Option<&ClassMapping> {
		self.inner_classes.get(simple_name)
	}
}

/// The mapping of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
	pub obfuscated: FieldSignature,
	pub deobfuscated_name: FieldName,
}

impl FieldMapping {
	pub fn identity(obfuscated: FieldSignature) -> FieldMapping {
		let deobfuscated_name = obfuscated.name.clone();
		FieldMapping { obfuscated, deobfuscated_name }
	}

	pub fn has_deobfuscated_name(&self) -> bool {
		self.deobfuscated_name != self.obfuscated.name
	}
}

/// The mapping of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMapping {
	pub obfuscated: MethodSignature,
	pub deobfuscated_name: MethodName,
}

impl MethodMapping {
	pub fn identity(obfuscated: MethodSignature) -> MethodMapping {
		let deobfuscated_name = obfuscated.name.clone();
		MethodMapping { obfuscated, deobfuscated_name }
	}

	pub fn has_deobfuscated_name(&self) -> bool {
		self.deobfuscated_name != self.obfuscated.name
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use duke::tree::class::ClassName;
	use duke::tree::field::{FieldDescriptor, FieldName, FieldSignature};
	use crate::tree::mappings::MappingSet;

	fn field(name: &str, desc: Option<&str>) -> Result<FieldSignature> {
		Ok(FieldSignature::new(FieldName::try_from(name)?, desc.map(FieldDescriptor::try_from).transpose()?))
	}

	#[test]
	fn get_or_create_is_idempotent() -> Result<()> {
		let mut mappings = MappingSet::new();
		let name = ClassName::try_from("hj")?;

		mappings.get_or_create_class(&name).set_deobfuscated_name("net/example/TestTarget")?;
		let again = mappings.get_or_create_class(&name);
		assert_eq!(again.deobfuscated_name, "net/example/TestTarget");
		assert!(again.has_deobfuscated_name());
		assert_eq!(mappings.classes.len(), 1);
		Ok(())
	}

	#[test]
	fn inner_classes_are_nested() -> Result<()> {
		let mut mappings = MappingSet::new();
		let name = ClassName::try_from("hj$a$b")?;
		mappings.get_or_create_class(&name);

		let top = mappings.get_top_level_class(&ClassName::try_from("hj")?);
		assert_eq!(top.map(|x| x.inner_classes.len()), Some(1));
		assert!(mappings.get_top_level_class(&name).is_none());

		let inner = mappings.get_class(&name);
		assert_eq!(inner.map(|x| x.obfuscated_name.as_str()), Some("hj$a$b"));
		assert_eq!(inner.map(|x| x.deobfuscated_name.as_str()), Some("b"));

		let names: Vec<_> = mappings.all_classes().map(|x| x.obfuscated_name.as_str()).collect();
		assert_eq!(names, vec!["hj", "hj$a", "hj$a$b"]);
		Ok(())
	}

	#[test]
	fn inner_class_names_are_simple() -> Result<()> {
		let mut mappings = MappingSet::new();
		let inner = mappings.get_or_create_class(&ClassName::try_from("hj$a")?);
		assert!(inner.set_deobfuscated_name("Outer$Inner").is_err());
		assert!(inner.set_deobfuscated_name("a/Inner").is_err());
		inner.set_deobfuscated_name("Inner")?;
		Ok(())
	}

	#[test]
	fn compute_field_fallbacks() -> Result<()> {
		let mut mappings = MappingSet::new();
		let class = mappings.get_or_create_class(&ClassName::try_from("hj")?);

		class.get_or_create_field(&field("yu", Some("I"))?).deobfuscated_name = FieldName::try_from("age")?;
		class.get_or_create_field(&field("agh", None)?).deobfuscated_name = FieldName::try_from("name")?;

		// untyped finds the typed one by name
		assert_eq!(class.compute_field(&field("yu", None)?).map(|x| x.deobfuscated_name.as_str()), Some("age"));
		// exact
		assert_eq!(class.compute_field(&field("yu", Some("I"))?).map(|x| x.deobfuscated_name.as_str()), Some("age"));
		// single field with that name, other type
		assert_eq!(class.compute_field(&field("yu", Some("J"))?).map(|x| x.deobfuscated_name.as_str()), Some("age"));

		// the untyped mapping gets materialized with the full signature
		let typed = field("agh", Some("Ljava/lang/String;"))?;
		assert_eq!(class.compute_field(&typed).map(|x| x.deobfuscated_name.as_str()), Some("name"));
		assert!(class.get_field(&typed).is_some());

		assert_eq!(class.compute_field(&field("nope", Some("I"))?), None);
		Ok(())
	}

	#[test]
	fn compute_field_ambiguous_by_type() -> Result<()> {
		let mut mappings = MappingSet::new();
		let class = mappings.get_or_create_class(&ClassName::try_from("hj")?);

		class.get_or_create_field(&field("a", Some("I"))?).deobfuscated_name = FieldName::try_from("count")?;
		class.get_or_create_field(&field("a", Some("J"))?).deobfuscated_name = FieldName::try_from("time")?;

		assert_eq!(class.compute_field(&field("a", Some("Z"))?), None);
		Ok(())
	}
}
