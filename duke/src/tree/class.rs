use anyhow::{bail, Result};
use crate::macros::{make_display, make_string_str_like};

make_string_str_like!(
	/// Represents a class name.
	///
	/// The class name uses [internal binary names](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.2.1), i.e. with complete path
	/// written out and using slashes.
	///
	/// Names written in source code (`a.b.C`) can be converted with [`ClassName::from_dotted`].
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	///
	/// let java_lang_object = ClassName::JAVA_LANG_OBJECT.to_owned();
	/// assert_eq!(java_lang_object, ClassName::try_from("java/lang/Object").unwrap());
	/// ```
	pub ClassName(String);
	/// A [`ClassName`] slice.
	pub ClassNameSlice(str);
	is_valid(s) = if crate::tree::names::is_valid_class_name(s) {
		Ok(())
	} else {
		bail!("invalid class name: must consist out of `/` separated non-empty parts, and not contain any of `.`, `;`, `[`")
	};
);
make_display!(ClassName, ClassNameSlice);

impl ClassName {
	/// The class name of `java/lang/Object`.
	pub const JAVA_LANG_OBJECT: &'static ClassNameSlice = {
		// SAFETY: `java/lang/Object` is a valid class name.
		unsafe { ClassNameSlice::from_inner_unchecked("java/lang/Object") }
	};

	/// Parses a class name written in either dotted (`a.b.C`) or internal (`a/b/C`) form.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// assert_eq!(ClassName::from_dotted("a.b.C").unwrap().as_str(), "a/b/C");
	/// assert_eq!(ClassName::from_dotted("a/b/C").unwrap().as_str(), "a/b/C");
	/// assert!(ClassName::from_dotted("a..C").is_err());
	/// ```
	pub fn from_dotted(name: &str) -> Result<ClassName> {
		ClassName::try_from(name.replace('.', "/"))
	}

	/// Creates a class name for joining together an inner class parent name and an inner class name.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// let outer = ClassName::try_from("net/example/TestTarget").unwrap();
	/// assert_eq!(ClassName::from_inner_class_parent_and_name(&outer, "Inner").unwrap().as_str(), "net/example/TestTarget$Inner");
	/// ```
	pub fn from_inner_class_parent_and_name(parent: &ClassNameSlice, inner: &str) -> Result<ClassName> {
		if inner.is_empty() || inner.contains('$') {
			bail!("invalid inner class name {inner:?} for parent {parent:?}");
		}
		ClassName::try_from(format!("{parent}${inner}"))
	}
}

impl ClassNameSlice {
	/// Returns the name in the dotted form used by source code.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// assert_eq!(ClassName::JAVA_LANG_OBJECT.to_dotted(), "java.lang.Object");
	/// ```
	pub fn to_dotted(&self) -> String {
		self.as_str().replace('/', ".")
	}

	/// Returns the package part of the name, including the trailing `/`, or an empty string for
	/// classes in the default package.
	pub fn package(&self) -> &str {
		let s = self.as_str();
		s.rfind('/').map_or("", |i| &s[..=i])
	}

	/// Splits a class name into its top level class and the chain of inner class names.
	///
	/// A `$` only separates two classes if it's between two non-empty parts, so names like `a$$b`
	/// or `a$` are treated as top level classes.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// let name = ClassName::try_from("a/b/C$D$E").unwrap();
	/// let (top, inner) = name.split_nesting();
	/// assert_eq!(top.as_str(), "a/b/C");
	/// assert_eq!(inner, vec!["D", "E"]);
	///
	/// let name = ClassName::try_from("a/b/C$$D").unwrap();
	/// let (top, inner) = name.split_nesting();
	/// assert_eq!(top.as_str(), "a/b/C$$D");
	/// assert!(inner.is_empty());
	/// ```
	pub fn split_nesting(&self) -> (&ClassNameSlice, Vec<&str>) {
		let s = self.as_str();
		let simple_start = self.package().len();
		let simple = &s[simple_start..];
		let bytes = simple.as_bytes();

		let splits: Vec<usize> = simple.char_indices()
			.filter(|&(_, c)| c == '$')
			.map(|(i, _)| i)
			.filter(|&i| i > 0 && i + 1 < bytes.len() && bytes[i - 1] != b'$' && bytes[i + 1] != b'$')
			.collect();

		let Some(&first) = splits.first() else {
			return (self, Vec::new());
		};

		let mut inner = Vec::with_capacity(splits.len());
		for (index, &start) in splits.iter().enumerate() {
			let end = splits.get(index + 1).copied().unwrap_or(simple.len());
			inner.push(&simple[start + 1..end]);
		}

		// SAFETY: A prefix of a valid class name ending before a `$` is a valid class name.
		let top = unsafe { ClassNameSlice::from_inner_unchecked(&s[..simple_start + first]) };
		(top, inner)
	}

	/// Checks if this is the name of an inner class.
	pub fn is_inner_class(&self) -> bool {
		!self.split_nesting().1.is_empty()
	}

	/// Gets the name of the directly enclosing class, if this names an inner class.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// let name = ClassName::try_from("a/b/C$D$E").unwrap();
	/// assert_eq!(name.get_inner_class_parent().unwrap().as_str(), "a/b/C$D");
	/// assert!(ClassName::JAVA_LANG_OBJECT.get_inner_class_parent().is_none());
	/// ```
	pub fn get_inner_class_parent(&self) -> Option<&ClassNameSlice> {
		let (_, inner) = self.split_nesting();
		let last = inner.last()?;
		let s = self.as_str();
		let parent = &s[..s.len() - last.len() - 1];
		// SAFETY: Removing the last `$Inner` of a class name leaves a valid class name.
		Some(unsafe { ClassNameSlice::from_inner_unchecked(parent) })
	}
}
