use anyhow::Result;
use pretty_assertions::assert_eq;
use quill::inheritance::{ClassInfo, ClassInfos};
use dukemixin::cleaner::{clean_unit, CleanerEdit};
use dukemixin::constants;
use dukemixin::diagnostic::Diagnostic;

mod common;
use common::*;

const CLASSES: &str = r#"[
	{
		"name": "ExtendedTarget",
		"super_class": "hj",
		"fields": [
			{ "name": "own", "desc": "I", "is_final": true }
		]
	},
	{
		"name": "hj",
		"fields": [
			{ "name": "agh", "desc": "Ljava/lang/String;", "is_final": true },
			{ "name": "yu", "desc": "I" },
			{ "name": "hidden", "desc": "I", "is_private": true, "is_final": true }
		]
	}
]"#;

fn classes() -> Result<ClassInfos> {
	let classes: Vec<ClassInfo> = serde_json::from_str(CLASSES)?;
	Ok(classes.into_iter().collect())
}

#[test]
fn shadows_of_inherited_fields() -> Result<()> {
	let classes = classes()?;

	let agh_shadow = marker(constants::SHADOW);
	let own_shadow = marker(constants::SHADOW);
	let yu_mutable = marker(constants::MUTABLE);

	let mut class = class_decl("ExtendedTargetMixin", vec![mixin(&["ExtendedTarget"])?], vec![
		field("agh", "Ljava/lang/String;", vec![agh_shadow.clone()])?,
		field("yu", "I", vec![marker(constants::SHADOW), yu_mutable.clone()])?,
		field("hidden", "I", vec![marker(constants::SHADOW)])?,
	], vec![])?;

	let inner_shadow = marker(constants::SHADOW);
	class.inner_classes.push(class_decl("ExtendedTargetMixin$Inner", vec![mixin(&["ExtendedTarget"])?], vec![
		field("shadow$own", "I", vec![inner_shadow.clone(), marker(constants::FINAL)])?,
		field("own", "I", vec![own_shadow.clone()])?,
	], vec![])?);

	let output = clean_unit(&unit("ExtendedTargetMixin.java", vec![class]), &classes);

	assert_eq!(output.diagnostics, vec![]);
	assert_eq!(output.edits, vec![
		CleanerEdit::InsertAnnotation { after: agh_shadow.span, text: "@Final".to_owned() },
		CleanerEdit::RemoveAnnotation { span: yu_mutable.span, annotation: constants::MUTABLE.to_owned() },
		CleanerEdit::AddImport { class: constants::FINAL.to_owned() },
		CleanerEdit::InsertAnnotation { after: own_shadow.span, text: "@Final".to_owned() },
		CleanerEdit::AddImport { class: constants::FINAL.to_owned() },
	]);
	Ok(())
}

#[test]
fn malformed_mixins_do_not_stop_other_classes() -> Result<()> {
	let classes = classes()?;

	let broken = class_decl("BrokenMixin", vec![annotation(constants::MIXIN, vec![("value", string("ExtendedTarget"))])], vec![
		field("agh", "Ljava/lang/String;", vec![marker(constants::SHADOW)])?,
	], vec![])?;

	let agh_shadow = marker(constants::SHADOW);
	let working = class_decl("ExtendedTargetMixin", vec![mixin(&["ExtendedTarget"])?], vec![
		field("agh", "Ljava/lang/String;", vec![agh_shadow.clone()])?,
	], vec![])?;

	let output = clean_unit(&unit("ExtendedTargetMixin.java", vec![broken, working]), &classes);

	assert_eq!(output.edits, vec![
		CleanerEdit::InsertAnnotation { after: agh_shadow.span, text: "@Final".to_owned() },
		CleanerEdit::AddImport { class: constants::FINAL.to_owned() },
	]);
	assert_eq!(output.diagnostics.len(), 1);
	assert!(matches!(&output.diagnostics[0], Diagnostic::MalformedLinkage { class, member: None, .. } if class.as_str() == "BrokenMixin"));
	Ok(())
}
