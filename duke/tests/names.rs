use anyhow::Result;
use pretty_assertions::assert_eq;
use duke::tree::class::ClassName;
use duke::tree::field::FieldName;
use duke::tree::method::MethodName;

/// Checks names against a validity function, `true` meaning the name must be accepted.
fn check(kind: &str, is_valid: impl Fn(&str) -> bool, cases: &[(&str, bool)]) {
	for &(name, expected) in cases {
		assert_eq!(is_valid(name), expected, "validity of {name:?} as {kind} name");
	}
}

#[test]
fn class_names() {
	check("class", ClassName::is_valid, &[
		("hj", true),
		("hj$a", true),
		("1234", true), // numbers are allowed at the start, only the java language denies it
		("java/lang/Object", true),
		("net/example/mixin/TestTargetMixin", true),
		("", false),
		("/", false),
		("a/", false),
		("/a", false),
		("a//b", false),
		("net.example.TestTarget", false), // dotted names need to go through from_dotted
		("Lhj;", false),
		("[Lhj;", false),
		("[[[D", false),
	]);
}

#[test]
fn dotted_class_names() -> Result<()> {
	let name = ClassName::from_dotted("net.example.TestTarget")?;
	assert_eq!(name.as_str(), "net/example/TestTarget");
	assert_eq!(name.to_dotted(), "net.example.TestTarget");
	assert_eq!(name.package(), "net/example/");

	assert!(ClassName::from_dotted("net..TestTarget").is_err());
	assert!(ClassName::from_dotted(".TestTarget").is_err());

	Ok(())
}

#[test]
fn inner_class_names() -> Result<()> {
	let name = ClassName::try_from("net/example/TestTarget$Inner$Deeper")?;
	let (top, inner) = name.split_nesting();
	assert_eq!(top.as_str(), "net/example/TestTarget");
	assert_eq!(inner, vec!["Inner", "Deeper"]);
	assert_eq!(name.get_inner_class_parent().map(|x| x.as_str()), Some("net/example/TestTarget$Inner"));

	let joined = ClassName::from_inner_class_parent_and_name(top, "Inner")?;
	assert_eq!(joined.as_str(), "net/example/TestTarget$Inner");
	assert!(ClassName::from_inner_class_parent_and_name(top, "").is_err());

	Ok(())
}

#[test]
fn member_names() {
	check("field", FieldName::is_valid, &[
		("yu", true),
		("shadow$age", true),
		("while", true),
		("<init>", true), // only method names restrict < and >
		("", false),
		("a.b", false),
		("a;b", false),
		("a[b", false),
		("a/b", false),
	]);
	check("method", MethodName::is_valid, &[
		("gyhu", true),
		("<init>", true),
		("<clinit>", true),
		("handler$zza000$onStart", true),
		("if$getName", true),
		("", false),
		("<foo>", false),
		("<clinit", false),
		("init>", false),
		("a.b", false),
		("a/b", false),
	]);
}

#[test]
fn special_method_names() -> Result<()> {
	assert!(MethodName::INIT.is_special());
	assert!(MethodName::CLINIT.is_special());
	assert!(!MethodName::try_from("run")?.is_special());
	Ok(())
}
