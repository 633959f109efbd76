use anyhow::Result;
use pretty_assertions::assert_eq;
use duke::tree::class::ClassName;
use duke::tree::method::{MethodName, MethodSignature};
use quill::inheritance::{ClassInfo, ClassInfos};
use dukemixin::annotation::ElementValue;
use dukemixin::constants;
use dukemixin::engine::MixinRemapper;

mod common;
use common::*;

// ExtendedTarget has no mappings, it gets all of them from hj
const CLASSES: &str = r#"[
	{
		"name": "ExtendedTarget",
		"super_class": "hj",
		"methods": [
			{ "name": "<init>", "desc": "()V" },
			{ "name": "extra", "desc": "()V" }
		]
	},
	{
		"name": "hj",
		"super_class": "java/lang/Object",
		"interfaces": [ "ij" ],
		"fields": [
			{ "name": "yu", "desc": "I" }
		],
		"methods": [
			{ "name": "<init>", "desc": "()V" },
			{ "name": "gyhu", "desc": "()V" },
			{ "name": "julp", "desc": "()I" }
		]
	},
	{
		"name": "ij",
		"methods": [
			{ "name": "a", "desc": "()Ljava/lang/String;" }
		]
	}
]"#;

fn classes() -> Result<ClassInfos> {
	let classes: Vec<ClassInfo> = serde_json::from_str(CLASSES)?;
	Ok(classes.into_iter().collect())
}

#[test]
fn shadows_of_inherited_members() -> Result<()> {
	let mut mappings = mappings()?;
	let classes = classes()?;

	let class = class_decl("ExtendedTargetMixin", vec![mixin(&["ExtendedTarget"])?], vec![
		field("shadow$yu", "I", vec![marker(constants::SHADOW)])?,
	], vec![
		method("gyhu", "()V", vec![marker(constants::SHADOW)])?,
		method("extra", "()V", vec![marker(constants::OVERWRITE)])?,
		method("onRun", "()V", vec![annotation(constants::INJECT, vec![
			("method", string("julp")),
			("at", at("INVOKE", "LExtendedTarget;gyhu()V")),
		])])?,
	])?;

	let mut remapper = MixinRemapper::new(&mut mappings, &classes);
	remapper.remap_class(&class);
	let output = remapper.into_output();

	// the class keeps its name, only the member is remapped
	assert_eq!(rewrites(&output), vec![
		("julp", "getAge"),
		("LExtendedTarget;gyhu()V", "LExtendedTarget;run()V"),
	]);

	assert_eq!(field_name(&mappings, "ExtendedTargetMixin", "shadow$yu:I")?.as_deref(), Some("shadow$age"));
	assert_eq!(method_name(&mappings, "ExtendedTargetMixin", "gyhu()V")?.as_deref(), Some("run"));
	assert_eq!(method_name(&mappings, "ExtendedTargetMixin", "extra()V")?.as_deref(), Some("extra"));
	assert_eq!(method_name(&mappings, "ExtendedTarget", "gyhu()V")?.as_deref(), Some("run"));
	Ok(())
}

#[test]
fn soft_implements() -> Result<()> {
	let mut mappings = mappings()?;
	let interface = mappings.get_or_create_class(&ClassName::try_from("ij")?);
	interface.set_deobfuscated_name("InterfaceTest")?;
	interface.get_or_create_method(&MethodSignature::parse("a()Ljava/lang/String;")?).deobfuscated_name = MethodName::try_from("getName")?;
	let classes = classes()?;

	let implements = annotation(constants::IMPLEMENTS, vec![
		("value", ElementValue::Annotation(annotation(constants::INTERFACE, vec![
			("iface", class("ij")?),
			("prefix", string("if$")),
		]))),
	]);
	let class = class_decl("TestImplementsMixin", vec![mixin(&["hj"])?, implements], vec![], vec![
		method("if$a", "()Ljava/lang/String;", vec![])?,
		method("if$b", "()Ljava/lang/String;", vec![])?,
		method("a", "()Ljava/lang/String;", vec![])?,
	])?;

	let mut remapper = MixinRemapper::new(&mut mappings, &classes);
	remapper.remap_class(&class);
	let output = remapper.into_output();

	assert_eq!(output.diagnostics, vec![]);
	assert_eq!(method_name(&mappings, "TestImplementsMixin", "if$a()Ljava/lang/String;")?.as_deref(), Some("if$getName"));
	assert_eq!(method_name(&mappings, "TestImplementsMixin", "if$b()Ljava/lang/String;")?, None);
	assert_eq!(method_name(&mappings, "TestImplementsMixin", "a()Ljava/lang/String;")?, None);
	Ok(())
}
