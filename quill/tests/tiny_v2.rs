use anyhow::Result;
use pretty_assertions::assert_eq;
use duke::tree::class::ClassName;
use duke::tree::field::FieldSignature;
use duke::tree::method::{MethodName, MethodSignature};

#[test]
fn read_and_write_again() -> Result<()> {
	let input = include_str!("test_target.tiny");

	let mappings = quill::tiny_v2::read(input.as_bytes())?;
	mappings.namespaces.check_that(["official", "named"])?;

	let actual = quill::tiny_v2::write_string(&mappings)?;

	assert_eq!(actual, input, "left: actual, right: expected");

	Ok(())
}

#[test]
fn lookups() -> Result<()> {
	let mappings = quill::tiny_v2::read(include_str!("test_target.tiny").as_bytes())?;

	let target = mappings.get_class(&ClassName::try_from("hj")?)
		.ok_or_else(|| anyhow::anyhow!("no mapping for hj"))?;
	assert_eq!(target.deobfuscated_name, "TestTarget");
	assert_eq!(target.fields.len(), 3);
	assert_eq!(target.methods.len(), 5);

	let age = target.get_field(&FieldSignature::parse("yu:I")?);
	assert_eq!(age.map(|x| x.deobfuscated_name.as_str()), Some("age"));

	let start = target.get_method(&MethodSignature::parse("hhj()V")?);
	assert_eq!(start.map(|x| x.deobfuscated_name.as_str()), Some("start"));

	let inner = mappings.get_class(&ClassName::try_from("hj$a")?)
		.ok_or_else(|| anyhow::anyhow!("no mapping for hj$a"))?;
	assert_eq!(inner.deobfuscated_name, "Inner");
	assert_eq!(inner.get_method(&MethodSignature::parse("a(Lhj;)V")?).map(|x| x.deobfuscated_name.as_str()), Some("accept"));

	let packaged = mappings.find_class_literal("obf.OutInner");
	assert_eq!(packaged.map(|x| x.deobfuscated_name.as_str()), Some("net/example/OuterInner"));

	Ok(())
}

#[test]
fn missing_deobfuscated_names_keep_the_obfuscated_ones() -> Result<()> {
	let input = "tiny\t2\t0\tofficial\tnamed\nc\thj\t\n\tm\t()V\tgyhu\t\n";

	let mappings = quill::tiny_v2::read(input.as_bytes())?;

	let target = mappings.get_class(&ClassName::try_from("hj")?)
		.ok_or_else(|| anyhow::anyhow!("no mapping for hj"))?;
	assert!(!target.has_deobfuscated_name());
	let run = target.get_method(&MethodSignature::parse("gyhu()V")?)
		.ok_or_else(|| anyhow::anyhow!("no mapping for gyhu"))?;
	assert!(!run.has_deobfuscated_name());

	Ok(())
}

#[test]
fn members_keeping_their_names_are_not_written() -> Result<()> {
	let input = include_str!("test_target.tiny");
	let mut mappings = quill::tiny_v2::read(input.as_bytes())?;

	// looked up, but never renamed
	let unmapped = mappings.get_or_create_class(&ClassName::try_from("Unmapped")?);
	unmapped.get_or_create_method(&MethodSignature::parse("run()V")?);
	unmapped.get_or_create_field(&FieldSignature::parse("value:I")?);
	mappings.get_or_create_class(&ClassName::try_from("hj")?)
		.get_or_create_field(&FieldSignature::parse("zz:I")?);

	// the class keeps its name, but has a renamed member
	mappings.get_or_create_class(&ClassName::try_from("Kept")?)
		.get_or_create_method(&MethodSignature::parse("kept()V")?)
		.deobfuscated_name = MethodName::try_from("doKept")?;

	let actual = quill::tiny_v2::write_string(&mappings)?;

	let (header, rest) = input.split_once('\n').ok_or_else(|| anyhow::anyhow!("no header"))?;
	let expected = format!("{header}\nc\tKept\tKept\n\tm\t()V\tkept\tdoKept\n{rest}");
	assert_eq!(actual, expected, "left: actual, right: expected");

	Ok(())
}

#[test]
fn rejects_bad_files() {
	let wrong_version = "tiny\t1\t0\tofficial\tnamed\n";
	assert!(quill::tiny_v2::read(wrong_version.as_bytes()).is_err());

	let three_namespaces = "tiny\t2\t0\tofficial\tintermediary\tnamed\n";
	assert!(quill::tiny_v2::read(three_namespaces.as_bytes()).is_err());

	let bad_descriptor = "tiny\t2\t0\tofficial\tnamed\nc\thj\tTestTarget\n\tm\t()Q\tgyhu\trun\n";
	assert!(quill::tiny_v2::read(bad_descriptor.as_bytes()).is_err());

	let bad_indent = "tiny\t2\t0\tofficial\tnamed\nc\thj\tTestTarget\n\t\tm\t()V\tgyhu\trun\n";
	assert!(quill::tiny_v2::read(bad_indent.as_bytes()).is_err());

	assert!(quill::tiny_v2::read("".as_bytes()).is_err());
}
