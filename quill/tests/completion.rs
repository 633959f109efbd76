use anyhow::{anyhow, Result};
use pretty_assertions::assert_eq;
use duke::tree::class::ClassName;
use duke::tree::field::FieldSignature;
use duke::tree::method::MethodSignature;
use quill::inheritance::{ClassInfo, ClassInfos};

// ExtendedTarget has no mappings of its own, everything comes from hj
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
		"interfaces": [ "InterfaceTest" ],
		"fields": [
			{ "name": "agh", "desc": "Ljava/lang/String;", "is_private": true, "is_final": true },
			{ "name": "yu", "desc": "I" }
		],
		"methods": [
			{ "name": "<init>", "desc": "()V" },
			{ "name": "gyhu", "desc": "()V" },
			{ "name": "julp", "desc": "()I" },
			{ "name": "hhj", "desc": "()V", "is_private": true }
		]
	},
	{
		"name": "InterfaceTest",
		"methods": [
			{ "name": "getName", "desc": "()Ljava/lang/String;" }
		]
	}
]"#;

fn read() -> Result<(quill::tree::mappings::MappingSet, ClassInfos)> {
	let mappings = quill::tiny_v2::read(include_str!("test_target.tiny").as_bytes())?;
	let classes: Vec<ClassInfo> = serde_json::from_str(CLASSES)?;
	Ok((mappings, classes.into_iter().collect()))
}

#[test]
fn inherits_mappings_from_super_class() -> Result<()> {
	let (mut mappings, classes) = read()?;

	let extended = ClassName::try_from("ExtendedTarget")?;
	mappings.complete(&extended, &classes)?;

	let mapping = mappings.get_class(&extended).ok_or_else(|| anyhow!("no mapping created"))?;

	let method = |s: &str| -> Result<Option<String>> {
		Ok(mapping.get_method(&MethodSignature::parse(s)?).map(|x| x.deobfuscated_name.as_str().to_owned()))
	};
	assert_eq!(method("gyhu()V")?.as_deref(), Some("run"));
	assert_eq!(method("julp()I")?.as_deref(), Some("getAge"));
	// declared on the class itself, kept as is
	assert_eq!(method("extra()V")?.as_deref(), Some("extra"));
	assert_eq!(method("<init>()V")?.as_deref(), Some("<init>"));
	// unmapped interface method, identity
	assert_eq!(method("getName()Ljava/lang/String;")?.as_deref(), Some("getName"));
	// private methods aren't inherited
	assert_eq!(method("hhj()V")?, None);

	let field = |s: &str| -> Result<Option<String>> {
		Ok(mapping.get_field(&FieldSignature::parse(s)?).map(|x| x.deobfuscated_name.as_str().to_owned()))
	};
	assert_eq!(field("yu:I")?.as_deref(), Some("age"));
	assert_eq!(field("agh:Ljava/lang/String;")?, None);

	Ok(())
}

#[test]
fn completing_twice_changes_nothing() -> Result<()> {
	let (mut mappings, classes) = read()?;

	let extended = ClassName::try_from("ExtendedTarget")?;
	mappings.complete(&extended, &classes)?;
	let first = quill::tiny_v2::write_string(&mappings)?;

	mappings.complete(&extended, &classes)?;
	let second = quill::tiny_v2::write_string(&mappings)?;

	assert_eq!(first, second);
	Ok(())
}

#[test]
fn completing_a_mapped_class_keeps_its_names() -> Result<()> {
	let (mut mappings, classes) = read()?;

	let target = ClassName::try_from("hj")?;
	mappings.complete(&target, &classes)?;

	let mapping = mappings.get_class(&target).ok_or_else(|| anyhow!("no mapping"))?;
	let start = mapping.get_method(&MethodSignature::parse("hhj()V")?);
	assert_eq!(start.map(|x| x.deobfuscated_name.as_str()), Some("start"));
	let get_name = mapping.get_method(&MethodSignature::parse("getName()Ljava/lang/String;")?);
	assert_eq!(get_name.map(|x| x.deobfuscated_name.as_str()), Some("getName"));
	// the private field is declared on hj itself
	let name = mapping.get_field(&FieldSignature::parse("agh:Ljava/lang/String;")?);
	assert_eq!(name.map(|x| x.deobfuscated_name.as_str()), Some("name"));

	Ok(())
}
