//! The declaration graph of a source file: its classes with their fields and methods, and the annotations on all of
//! them.
//!
//! All names are binary names in the obfuscated namespace, exactly as the source refers to them.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use duke::tree::class::ClassName;
use duke::tree::field::{FieldDescriptor, FieldName, FieldSignature};
use duke::tree::method::{MethodDescriptor, MethodName, MethodSignature};
use crate::annotation::Annotation;

/// One source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
	pub path: PathBuf,
	#[serde(default)]
	pub classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
	pub name: ClassName,
	#[serde(default)]
	pub annotations: Vec<Annotation>,
	#[serde(default)]
	pub fields: Vec<FieldDecl>,
	#[serde(default)]
	pub methods: Vec<MethodDecl>,
	/// Member classes, anonymous and local classes.
	#[serde(default)]
	pub inner_classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
	pub name: FieldName,
	pub desc: FieldDescriptor,
	#[serde(default)]
	pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
	pub name: MethodName,
	pub desc: MethodDescriptor,
	#[serde(default)]
	pub is_static: bool,
	#[serde(default)]
	pub annotations: Vec<Annotation>,
}

impl ClassDecl {
	pub fn annotation(&self, name: &str) -> Option<&Annotation> {
		self.annotations.iter().find(|a| a.is(name))
	}

	/// Visits this class and then all of its inner classes, depth first.
	pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a ClassDecl)) {
		f(self);
		for inner in &self.inner_classes {
			inner.walk(f);
		}
	}
}

impl FieldDecl {
	pub fn signature(&self) -> FieldSignature {
		FieldSignature::new(self.name.clone(), Some(self.desc.clone()))
	}

	pub fn annotation(&self, name: &str) -> Option<&Annotation> {
		self.annotations.iter().find(|a| a.is(name))
	}
}

impl MethodDecl {
	pub fn signature(&self) -> MethodSignature {
		MethodSignature::new(self.name.clone(), self.desc.clone())
	}

	pub fn annotation(&self, name: &str) -> Option<&Annotation> {
		self.annotations.iter().find(|a| a.is(name))
	}
}
