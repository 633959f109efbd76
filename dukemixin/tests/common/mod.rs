#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use anyhow::Result;
use duke::tree::class::ClassName;
use duke::tree::field::{FieldDescriptor, FieldName, FieldSignature};
use duke::tree::method::{MethodDescriptor, MethodName, MethodSignature};
use quill::tree::mappings::MappingSet;
use dukemixin::annotation::{Annotation, ElementValue, ElementValuePair, Span, StringLiteral};
use dukemixin::constants;
use dukemixin::declaration::{ClassDecl, FieldDecl, MethodDecl, SourceUnit};
use dukemixin::engine::RemapOutput;

static POSITION: AtomicUsize = AtomicUsize::new(0);

/// Gives each literal its own span, in the order they're created.
fn span(len: usize) -> Span {
	let start = POSITION.fetch_add(len + 1, Ordering::Relaxed);
	Span::new(start, start + len)
}

pub fn mappings() -> Result<MappingSet> {
	quill::tiny_v2::read(include_str!("../test_target.tiny").as_bytes())
}

pub fn literal(value: &str) -> StringLiteral {
	StringLiteral { value: value.to_owned(), span: span(value.len() + 2) }
}

pub fn string(value: &str) -> ElementValue {
	ElementValue::String(literal(value))
}

pub fn strings(values: &[&str]) -> ElementValue {
	ElementValue::Array(values.iter().map(|value| string(value)).collect())
}

pub fn class(name: &str) -> Result<ElementValue> {
	Ok(ElementValue::Class(ClassName::try_from(name)?))
}

pub fn annotation(name: &str, values: Vec<(&str, ElementValue)>) -> Annotation {
	Annotation {
		name: name.to_owned(),
		span: span(name.len()),
		values: values.into_iter()
			.map(|(name, value)| ElementValuePair { name: name.to_owned(), value })
			.collect(),
	}
}

pub fn marker(name: &str) -> Annotation {
	annotation(name, Vec::new())
}

pub fn at(value: &str, target: &str) -> ElementValue {
	ElementValue::Annotation(annotation(constants::AT, vec![("value", string(value)), ("target", string(target))]))
}

pub fn mixin(targets: &[&str]) -> Result<Annotation> {
	let targets = targets.iter()
		.map(|name| class(name))
		.collect::<Result<_>>()?;
	Ok(annotation(constants::MIXIN, vec![("value", ElementValue::Array(targets))]))
}

pub fn field(name: &str, desc: &str, annotations: Vec<Annotation>) -> Result<FieldDecl> {
	Ok(FieldDecl { name: FieldName::try_from(name)?, desc: FieldDescriptor::try_from(desc)?, annotations })
}

pub fn method(name: &str, desc: &str, annotations: Vec<Annotation>) -> Result<MethodDecl> {
	Ok(MethodDecl { name: MethodName::try_from(name)?, desc: MethodDescriptor::try_from(desc)?, is_static: false, annotations })
}

pub fn static_method(name: &str, desc: &str, annotations: Vec<Annotation>) -> Result<MethodDecl> {
	Ok(MethodDecl { is_static: true, ..method(name, desc, annotations)? })
}

pub fn class_decl(name: &str, annotations: Vec<Annotation>, fields: Vec<FieldDecl>, methods: Vec<MethodDecl>) -> Result<ClassDecl> {
	Ok(ClassDecl {
		name: ClassName::try_from(name)?,
		annotations,
		fields,
		methods,
		inner_classes: Vec::new(),
	})
}

pub fn unit(path: &str, classes: Vec<ClassDecl>) -> SourceUnit {
	SourceUnit { path: PathBuf::from(path), classes }
}

/// The rewrites as `(original, replacement)`, in the order they were planned.
pub fn rewrites(output: &RemapOutput) -> Vec<(&str, &str)> {
	output.instructions.iter()
		.map(|x| (x.original.as_str(), x.replacement.as_str()))
		.collect()
}

pub fn field_name(mappings: &MappingSet, class: &str, signature: &str) -> Result<Option<String>> {
	let signature = FieldSignature::parse(signature)?;
	Ok(mappings.get_class(&ClassName::try_from(class)?)
		.and_then(|mapping| mapping.get_field(&signature))
		.map(|field| field.deobfuscated_name.as_str().to_owned()))
}

pub fn method_name(mappings: &MappingSet, class: &str, signature: &str) -> Result<Option<String>> {
	let signature = MethodSignature::parse(signature)?;
	Ok(mappings.get_class(&ClassName::try_from(class)?)
		.and_then(|mapping| mapping.get_method(&signature))
		.map(|method| method.deobfuscated_name.as_str().to_owned()))
}
