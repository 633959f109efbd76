use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use log::trace;
use duke::tree::class::{ClassName, ClassNameSlice};
use duke::tree::field::{FieldName, FieldSignature};
use duke::tree::method::{MethodName, MethodSignature};
use crate::inheritance::{ancestors_of, InheritanceProvider};
use crate::tree::mappings::{FieldMapping, MappingSet, MethodMapping};

impl MappingSet {
	/// Completes the mapping of a class with the members it inherits.
	///
	/// For every member declared on the class itself, and every inheritable member declared on its ancestors, an
	/// entry is inserted unless there already is one. The deobfuscated name is copied from the nearest ancestor
	/// (including the class itself) that has a mapping for the same signature, otherwise the obfuscated name is
	/// kept.
	///
	/// This creates the class mapping if there's none. Completing the same class a second time does nothing.
	pub fn complete(&mut self, class: &ClassNameSlice, provider: &(impl InheritanceProvider + ?Sized)) -> Result<()> {
		if self.get_class(class).is_some_and(|mapping| mapping.completed) {
			return Ok(());
		}

		let ancestors = ancestors_of(provider, class)
			.with_context(|| anyhow!("failed to get ancestors of {class}"))?;

		// nearest first: the class itself, then its ancestors
		let mut fields: IndexMap<FieldSignature, FieldName> = IndexMap::new();
		let mut methods: IndexMap<MethodSignature, MethodName> = IndexMap::new();

		let chain: Vec<&ClassNameSlice> = std::iter::once(class)
			.chain(ancestors.iter().map(ClassName::as_slice))
			.collect();

		for (depth, &owner) in chain.iter().enumerate() {
			let Some(info) = provider.get_class_info(owner)? else {
				continue;
			};

			for field in &info.fields {
				if depth > 0 && field.is_private {
					continue;
				}
				let signature = field.signature();
				if !fields.contains_key(&signature) {
					let name = self.nearest_field_name(&chain[depth..], &signature);
					fields.insert(signature, name);
				}
			}

			for method in &info.methods {
				if depth > 0 && !method.is_inheritable() {
					continue;
				}
				let signature = method.signature();
				if !methods.contains_key(&signature) {
					let name = self.nearest_method_name(&chain[depth..], &signature);
					methods.insert(signature, name);
				}
			}
		}

		let mapping = self.get_or_create_class(class);
		for (signature, deobfuscated_name) in fields {
			if !mapping.fields.contains_key(&signature) {
				trace!("completing {class} with field {signature} -> {deobfuscated_name}");
				mapping.fields.insert(signature.clone(), FieldMapping { obfuscated: signature, deobfuscated_name });
			}
		}
		for (signature, deobfuscated_name) in methods {
			if !mapping.methods.contains_key(&signature) {
				trace!("completing {class} with method {signature} -> {deobfuscated_name}");
				mapping.methods.insert(signature.clone(), MethodMapping { obfuscated: signature, deobfuscated_name });
			}
		}
		mapping.completed = true;

		Ok(())
	}

	fn nearest_field_name(&self, chain: &[&ClassNameSlice], signature: &FieldSignature) -> FieldName {
		chain.iter()
			.filter_map(|&owner| self.get_class(owner))
			.find_map(|mapping| mapping.get_field(signature))
			.map_or_else(|| signature.name.clone(), |field| field.deobfuscated_name.clone())
	}

	fn nearest_method_name(&self, chain: &[&ClassNameSlice], signature: &MethodSignature) -> MethodName {
		chain.iter()
			.filter_map(|&owner| self.get_class(owner))
			.find_map(|mapping| mapping.get_method(signature))
			.map_or_else(|| signature.name.clone(), |method| method.deobfuscated_name.clone())
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use duke::tree::class::ClassName;
	use duke::tree::method::{MethodDescriptor, MethodName, MethodSignature};
	use crate::inheritance::{ClassInfo, ClassInfos, MethodInfo};
	use crate::tree::mappings::MappingSet;

	fn method(name: &str, desc: &str, is_private: bool) -> Result<MethodInfo> {
		Ok(MethodInfo {
			name: MethodName::try_from(name)?,
			desc: MethodDescriptor::try_from(desc)?,
			is_private,
			is_static: false,
		})
	}

	fn signature(name: &str, desc: &str) -> Result<MethodSignature> {
		Ok(MethodSignature::new(MethodName::try_from(name)?, MethodDescriptor::try_from(desc)?))
	}

	#[test]
	fn copies_from_nearest_mapped_ancestor() -> Result<()> {
		let infos: ClassInfos = [
			ClassInfo {
				name: ClassName::try_from("sub")?,
				super_class: Some(ClassName::try_from("mid")?),
				interfaces: Vec::new(),
				fields: Vec::new(),
				methods: Vec::new(),
			},
			ClassInfo {
				name: ClassName::try_from("mid")?,
				super_class: Some(ClassName::try_from("hj")?),
				interfaces: Vec::new(),
				fields: Vec::new(),
				// overrides gyhu, without a mapping of its own
				methods: vec![method("gyhu", "()V", false)?, method("a", "()V", true)?],
			},
			ClassInfo {
				name: ClassName::try_from("hj")?,
				super_class: None,
				interfaces: Vec::new(),
				fields: Vec::new(),
				methods: vec![method("gyhu", "()V", false)?, method("<init>", "()V", false)?],
			},
		].into_iter().collect();

		let mut mappings = MappingSet::new();
		mappings.get_or_create_class(&ClassName::try_from("hj")?)
			.get_or_create_method(&signature("gyhu", "()V")?)
			.deobfuscated_name = MethodName::try_from("run")?;

		let sub = ClassName::try_from("sub")?;
		mappings.complete(&sub, &infos)?;

		let sub = mappings.get_class(&sub).ok_or_else(|| anyhow::anyhow!("no mapping"))?;
		assert_eq!(sub.get_method(&signature("gyhu", "()V")?).map(|x| x.deobfuscated_name.as_str()), Some("run"));
		// private methods and constructors are not inherited
		assert!(sub.get_method(&signature("a", "()V")?).is_none());
		assert!(sub.get_method(&signature("<init>", "()V")?).is_none());
		Ok(())
	}

	#[test]
	fn never_overwrites() -> Result<()> {
		let infos: ClassInfos = [
			ClassInfo {
				name: ClassName::try_from("sub")?,
				super_class: Some(ClassName::try_from("hj")?),
				interfaces: Vec::new(),
				fields: Vec::new(),
				methods: Vec::new(),
			},
			ClassInfo {
				name: ClassName::try_from("hj")?,
				super_class: None,
				interfaces: Vec::new(),
				fields: Vec::new(),
				methods: vec![method("gyhu", "()V", false)?],
			},
		].into_iter().collect();

		let mut mappings = MappingSet::new();
		mappings.get_or_create_class(&ClassName::try_from("sub")?)
			.get_or_create_method(&signature("gyhu", "()V")?)
			.deobfuscated_name = MethodName::try_from("execute")?;

		let sub = ClassName::try_from("sub")?;
		mappings.complete(&sub, &infos)?;

		let sub = mappings.get_class(&sub).ok_or_else(|| anyhow::anyhow!("no mapping"))?;
		assert_eq!(sub.get_method(&signature("gyhu", "()V")?).map(|x| x.deobfuscated_name.as_str()), Some("execute"));
		Ok(())
	}
}
