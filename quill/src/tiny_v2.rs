//! Functions to read and write a [`MappingSet`] in the "Tiny v2" format.
//!
//! # Reading
//! You can read a `.tiny` file using the [`read_file`] method, by passing a path.
//! If you already have a [`Read`]er, you can use the [`read`] method.
//!
//! Only files with exactly two namespaces can be read. Comments (`c`) and parameter (`p`) lines are skipped.
//! It's recommended to check that the namespaces are indeed the ones expected.
//! See [`Namespaces::check_that`][crate::tree::names::Namespaces::check_that] for more info.
//!
//! # Writing
//! For writing `.tiny` files, there are the [`write`][fn@write] and the [`write_string`] methods.
//!
//! Note that all writing sorts the output, and that inner classes are written as their own `c` lines.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use duke::tree::class::ClassName;
use duke::tree::field::{FieldDescriptor, FieldName, FieldSignature};
use duke::tree::method::{MethodDescriptor, MethodName, MethodSignature};
use crate::lines::{Level, TinyLine};
use crate::remapper::ClassRemapper;
use crate::tree::mappings::{ClassMapping, MappingSet};
use crate::tree::names::Namespaces;

/// Reads a `.tiny` file (tiny v2), by opening the file given by the path.
pub fn read_file(path: impl AsRef<Path>) -> Result<MappingSet> {
	read(File::open(&path)?)
		.with_context(|| anyhow!("failed to read mappings file {:?} as tiny v2 file", path.as_ref()))
}

#[allow(clippy::tabs_in_doc_comments)]
/// Reads the tiny v2 format, from the given reader.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use duke::tree::class::ClassName;
/// let string = "\
/// tiny	2	0	official	named
/// c	hj	net/example/TestTarget
/// 	f	I	yu	age
/// 		c	a comment
/// 	m	()V	gyhu	run
/// 		p	1		value
/// c	hj$a	net/example/TestTarget$Inner
/// ";
///
/// let mappings = quill::tiny_v2::read(string.as_bytes()).unwrap();
///
/// mappings.namespaces.check_that(["official", "named"]).unwrap();
/// assert_eq!(mappings.classes.len(), 1);
/// let inner = mappings.get_class(&ClassName::try_from("hj$a").unwrap()).unwrap();
/// assert_eq!(inner.deobfuscated_name, "Inner");
/// ```
pub fn read(reader: impl Read) -> Result<MappingSet> {
	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.map(|(line_number, line)| -> Result<TinyLine> {
			TinyLine::new(line_number + 1, &line?)
		})
		.peekable();

	let mut header = lines.next().context("no header line")??;
	let header_line_number = header.line_number;

	if header.first_field != "tiny" || header.next()? != "2" || header.next()? != "0" {
		bail!("header version isn't tiny v2.0, in line {header:?}");
	}

	let namespaces = Namespaces::try_from(header.rest())
		.with_context(|| anyhow!("on line {header_line_number}"))?;

	let mut mappings = MappingSet::with_namespaces(namespaces);

	Level::top(&mut lines).for_each_line(|level, line| {
		if line.first_field == "c" {
			let (obfuscated, deobfuscated) = line.names::<ClassName>()?;
			let class = mappings.get_or_create_class(&obfuscated);
			if let Some(deobfuscated) = deobfuscated {
				let name = if class.obfuscated_name.is_inner_class() {
					// inner classes store only their own name
					let simple = deobfuscated.split_nesting().1.last().copied()
						.unwrap_or(&deobfuscated.as_str()[deobfuscated.package().len()..]);
					simple.to_owned()
				} else {
					deobfuscated.into_inner()
				};
				class.set_deobfuscated_name(&name)?;
			}

			level.nested().for_each_line(|level, mut line| {
				if line.first_field == "f" {
					let desc = FieldDescriptor::try_from(line.next()?)?;
					let (name, deobfuscated) = line.names::<FieldName>()?;
					let field = class.get_or_create_field(&FieldSignature::new(name, Some(desc)));
					if let Some(deobfuscated) = deobfuscated {
						field.deobfuscated_name = deobfuscated;
					}
				} else if line.first_field == "m" {
					let desc = MethodDescriptor::try_from(line.next()?)?;
					let (name, deobfuscated) = line.names::<MethodName>()?;
					let method = class.get_or_create_method(&MethodSignature::new(name, desc));
					if let Some(deobfuscated) = deobfuscated {
						method.deobfuscated_name = deobfuscated;
					}
				}
				level.nested().skip_all()
			}).context("reading class sub-sections")
		} else {
			level.nested().skip_all()
		}
	}).context("reading lines")?;

	if let Some(line) = lines.next() {
		bail!("expected end of input, got: {line:?}");
	}

	Ok(mappings)
}

/// Writes the given mappings into a `String`, in the tiny v2 format.
///
/// This method is of most use in test cases, where you also use the `pretty_assertions` crate for viewing string diffs.
pub fn write_string(mappings: &MappingSet) -> Result<String> {
	let mut vec = Vec::new();
	write(mappings, &mut vec)?;
	String::from_utf8(vec).context("failed to convert written mappings to utf8")
}

#[allow(clippy::tabs_in_doc_comments)]
/// Writes the given mappings to the given writer, in the tiny v2 format.
///
/// Classes, fields and methods are sorted by their obfuscated names. Fields without a descriptor can't be written
/// and are skipped.
///
/// Fields and methods keeping their name aren't written. Such entries come from completing a class or from looking up
/// members nothing renames. A class keeping its name is only written if some of its members are.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// let input = "\
/// tiny	2	0	official	named
/// c	hj$a	net/example/TestTarget$Inner
/// c	hj	net/example/TestTarget
/// 	m	()V	gyhu	run
/// 	f	I	yu	age
/// 	m	()I	julp	getAge
/// ";
///
/// let mappings = quill::tiny_v2::read(input.as_bytes()).unwrap();
/// let written = quill::tiny_v2::write_string(&mappings).unwrap();
///
/// let output = "\
/// tiny	2	0	official	named
/// c	hj	net/example/TestTarget
/// 	f	I	yu	age
/// 	m	()I	julp	getAge
/// 	m	()V	gyhu	run
/// c	hj$a	net/example/TestTarget$Inner
/// ";
///
/// assert_eq!(written, output);
/// ```
pub fn write(mappings: &MappingSet, w: &mut impl Write) -> Result<()> {
	// the buffering makes it much faster
	let mut w = BufWriter::new(w);
	let w = &mut w;

	write!(w, "tiny\t2\t0")?;
	for namespace in mappings.namespaces.names() {
		write!(w, "\t{namespace}")?;
	}
	writeln!(w)?;

	let mut classes: Vec<&ClassMapping> = mappings.all_classes().collect();
	classes.sort_by(|a, b| a.obfuscated_name.cmp(&b.obfuscated_name));
	for class in classes {
		let mut fields: Vec<_> = class.fields.values()
			.filter(|field| field.has_deobfuscated_name())
			.filter_map(|field| field.obfuscated.desc.as_ref().map(|desc| (field, desc)))
			.collect();
		fields.sort_by(|(a, _), (b, _)| a.obfuscated.cmp(&b.obfuscated));

		let mut methods: Vec<_> = class.methods.values()
			.filter(|method| method.has_deobfuscated_name())
			.collect();
		methods.sort_by(|a, b| (&a.obfuscated.desc, &a.obfuscated.name).cmp(&(&b.obfuscated.desc, &b.obfuscated.name)));

		let deobfuscated = mappings.map_class(&class.obfuscated_name)?;
		if deobfuscated == class.obfuscated_name && fields.is_empty() && methods.is_empty() {
			continue;
		}

		writeln!(w, "c\t{}\t{}", class.obfuscated_name, deobfuscated)?;
		for (field, desc) in fields {
			writeln!(w, "\tf\t{}\t{}\t{}", desc, field.obfuscated.name, field.deobfuscated_name)?;
		}
		for method in methods {
			writeln!(w, "\tm\t{}\t{}\t{}", method.obfuscated.desc, method.obfuscated.name, method.deobfuscated_name)?;
		}
	}

	w.flush()?;

	Ok(())
}
