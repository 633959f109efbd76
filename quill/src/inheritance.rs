//! Inheritance information about classes, used for [completing][crate::tree::mappings::MappingSet::complete]
//! class mappings with inherited members.

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use duke::tree::class::{ClassName, ClassNameSlice};
use duke::tree::field::{FieldDescriptor, FieldName, FieldSignature};
use duke::tree::method::{MethodDescriptor, MethodName, MethodSignature};

/// A class, as seen by the inheritance provider. All names are obfuscated names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
	pub name: ClassName,
	#[serde(default)]
	pub super_class: Option<ClassName>,
	#[serde(default)]
	pub interfaces: Vec<ClassName>,
	#[serde(default)]
	pub fields: Vec<FieldInfo>,
	#[serde(default)]
	pub methods: Vec<MethodInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
	pub name: FieldName,
	pub desc: FieldDescriptor,
	#[serde(default)]
	pub is_private: bool,
	#[serde(default)]
	pub is_final: bool,
}

impl FieldInfo {
	pub fn signature(&self) -> FieldSignature {
		FieldSignature::new(self.name.clone(), Some(self.desc.clone()))
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
	pub name: MethodName,
	pub desc: MethodDescriptor,
	#[serde(default)]
	pub is_private: bool,
	#[serde(default)]
	pub is_static: bool,
}

impl MethodInfo {
	pub fn signature(&self) -> MethodSignature {
		MethodSignature::new(self.name.clone(), self.desc.clone())
	}

	/// Checks if subclasses see this method: private methods and constructors are not inherited.
	pub fn is_inheritable(&self) -> bool {
		!self.is_private && !self.name.is_special()
	}
}

/// Answers questions about the declared members and the direct super types of classes.
pub trait InheritanceProvider {
	/// Gets the information about a class, or `Ok(None)` if the class is unknown.
	fn get_class_info(&self, class: &ClassNameSlice) -> Result<Option<&ClassInfo>>;
}

/// An [`InheritanceProvider`] backed by a list of [`ClassInfo`]s, for example read from a json file.
#[derive(Debug, Clone, Default)]
pub struct ClassInfos {
	classes: IndexMap<ClassName, ClassInfo>,
}

impl ClassInfos {
	pub fn new() -> ClassInfos {
		ClassInfos::default()
	}

	pub fn add(&mut self, class: ClassInfo) {
		self.classes.insert(class.name.clone(), class);
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}
}

impl FromIterator<ClassInfo> for ClassInfos {
	fn from_iter<T: IntoIterator<Item=ClassInfo>>(iter: T) -> Self {
		let mut infos = ClassInfos::new();
		for class in iter {
			infos.add(class);
		}
		infos
	}
}

impl InheritanceProvider for ClassInfos {
	fn get_class_info(&self, class: &ClassNameSlice) -> Result<Option<&ClassInfo>> {
		Ok(self.classes.get(class))
	}
}

/// An [`InheritanceProvider`] that doesn't know any class.
pub struct NoInheritanceProvider;

impl NoInheritanceProvider {
	pub fn new() -> &'static NoInheritanceProvider {
		static INSTANCE: NoInheritanceProvider = NoInheritanceProvider;
		&INSTANCE
	}
}

impl InheritanceProvider for NoInheritanceProvider {
	fn get_class_info(&self, _class: &ClassNameSlice) -> Result<Option<&ClassInfo>> {
		Ok(None)
	}
}

/// Collects all the super classes and super interfaces of a class, nearest first.
///
/// The super class comes before the interfaces; each class is returned once, the class itself and
/// `java/lang/Object` are never returned. Classes the provider doesn't know end the walk along that path.
pub fn ancestors_of(provider: &(impl InheritanceProvider + ?Sized), class: &ClassNameSlice) -> Result<Vec<ClassName>> {
	let mut seen = IndexSet::new();
	seen.insert(class.to_owned());

	let mut ancestors = Vec::new();
	let mut queue = std::collections::VecDeque::from([class.to_owned()]);
	while let Some(current) = queue.pop_front() {
		let Some(info) = provider.get_class_info(&current)? else {
			continue;
		};

		for parent in info.super_class.iter().chain(info.interfaces.iter()) {
			if parent == ClassName::JAVA_LANG_OBJECT || !seen.insert(parent.clone()) {
				continue;
			}
			ancestors.push(parent.clone());
			queue.push_back(parent.clone());
		}
	}

	Ok(ancestors)
}
