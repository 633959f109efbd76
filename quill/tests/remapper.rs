use anyhow::Result;
use pretty_assertions::assert_eq;
use duke::tree::class::ClassName;
use duke::tree::field::FieldDescriptor;
use duke::tree::method::MethodDescriptor;
use quill::remapper::ClassRemapper;

#[test]
fn remap() -> Result<()> {
	let mappings = quill::tiny_v2::read(include_str!("test_target.tiny").as_bytes())?;

	let class = |class: &'static str| -> Result<String> {
		Ok(mappings.map_class(&ClassName::try_from(class)?)?.into_inner())
	};

	assert_eq!(class("hj")?, "TestTarget");
	assert_eq!(class("hj$a")?, "TestTarget$Inner");
	assert_eq!(class("hj$b")?, "TestTarget$b");
	assert_eq!(class("obf/OutInner")?, "net/example/OuterInner");
	assert_eq!(class("obf/OutInner$1")?, "net/example/OuterInner$1");
	assert_eq!(class("java/lang/String")?, "java/lang/String");

	let field = |desc: &'static str| -> Result<String> {
		Ok(mappings.map_field_desc(&FieldDescriptor::try_from(desc)?)?.into_inner())
	};

	assert_eq!(field("I")?, "I");
	assert_eq!(field("Lhj;")?, "LTestTarget;");
	assert_eq!(field("[[Lhj$a;")?, "[[LTestTarget$Inner;");
	assert_eq!(field("Ljava/lang/Object;")?, "Ljava/lang/Object;");

	let method = |desc: &'static str| -> Result<String> {
		Ok(mappings.map_method_desc(&MethodDescriptor::try_from(desc)?)?.into_inner())
	};

	assert_eq!(method("()V")?, "()V");
	assert_eq!(method("(Lhj;IJ)Lhj$a;")?, "(LTestTarget;IJ)LTestTarget$Inner;");
	assert_eq!(method("([Lobf/OutInner;Z)[I")?, "([Lnet/example/OuterInner;Z)[I");

	Ok(())
}

#[test]
fn unmapped_classes() -> Result<()> {
	let mappings = quill::tiny_v2::read(include_str!("test_target.tiny").as_bytes())?;

	assert!(mappings.map_class_fail(&ClassName::try_from("ExtendedTarget")?)?.is_none());
	assert!(mappings.map_class_fail(&ClassName::try_from("hj")?)?.is_some());

	Ok(())
}
