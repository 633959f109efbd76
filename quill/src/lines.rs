//! Splitting tab separated, tab indented lines into fields, and walking them by indentation level.

use std::cmp::Ordering;
use std::iter::Peekable;
use anyhow::{anyhow, bail, Context, Result};

#[derive(Debug)]
pub(crate) struct TinyLine {
	pub(crate) line_number: usize,
	indent: usize,
	pub(crate) first_field: String,
	fields: std::vec::IntoIter<String>,
}

impl TinyLine {
	pub(crate) fn new(line_number: usize, line: &str) -> Result<TinyLine> {
		// `\t` is a single byte, so counting chars gives the byte offset here
		let indent = line.chars().take_while(|x| *x == '\t').count();

		let mut fields = line[indent..].split('\t').map(|x| x.to_owned());
		let first_field = fields.next()
			.with_context(|| anyhow!("no first field in line {line_number}"))?;

		Ok(TinyLine {
			line_number,
			indent,
			first_field,
			fields: fields.collect::<Vec<_>>().into_iter(),
		})
	}

	pub(crate) fn next(&mut self) -> Result<String> {
		self.fields.next()
			.with_context(|| anyhow!("expected another field in line {}: {self:?}", self.line_number))
	}

	/// The remaining fields.
	pub(crate) fn rest(self) -> Vec<String> {
		self.fields.collect()
	}

	/// Reads the obfuscated and the deobfuscated name, the latter being optional (an empty field).
	///
	/// These must be the last two fields of the line.
	pub(crate) fn names<T>(mut self) -> Result<(T, Option<T>)>
	where
		T: TryFrom<String, Error=anyhow::Error>,
	{
		let line_number = self.line_number;
		let obfuscated = T::try_from(self.next()?)
			.with_context(|| anyhow!("invalid obfuscated name on line {line_number}"))?;
		let deobfuscated = self.fields.next()
			.filter(|x| !x.is_empty())
			.map(T::try_from)
			.transpose()
			.with_context(|| anyhow!("invalid deobfuscated name on line {line_number}"))?;

		if !self.fields.as_slice().is_empty() {
			bail!("line {line_number} contained more fields than expected: {self:?}");
		}

		Ok((obfuscated, deobfuscated))
	}
}

/// The lines of one indentation level, ending when a line with less indentation comes.
pub(crate) struct Level<'a, I: Iterator<Item=Result<TinyLine>>> {
	depth: usize,
	lines: &'a mut Peekable<I>,
}

impl<'a, I: Iterator<Item=Result<TinyLine>>> Level<'a, I> {
	pub(crate) fn top(lines: &'a mut Peekable<I>) -> Level<'a, I> {
		Level { depth: 0, lines }
	}

	pub(crate) fn nested(&mut self) -> Level<'_, I> {
		Level { depth: self.depth + 1, lines: self.lines }
	}

	pub(crate) fn for_each_line(mut self, mut f: impl FnMut(&mut Self, TinyLine) -> Result<()>) -> Result<()> {
		while let Some(line) = self.next() {
			let line = line?;
			let line_number = line.line_number;

			f(&mut self, line)
				.with_context(|| anyhow!("in line {line_number}"))?;
		}
		Ok(())
	}

	/// Consumes all the lines of this level, and all the lines nested deeper.
	pub(crate) fn skip_all(self) -> Result<()> {
		self.for_each_line(|level, _| level.nested().skip_all())
	}
}

impl<I: Iterator<Item=Result<TinyLine>>> Iterator for Level<'_, I> {
	type Item = Result<TinyLine>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.lines.peek()? {
			Ok(line) => match line.indent.cmp(&self.depth) {
				Ordering::Less => None,
				Ordering::Equal => self.lines.next(),
				Ordering::Greater => Some(Err(anyhow!("expected an indentation of {} for line {}: {line:?}", self.depth, line.line_number))),
			},
			Err(_) => self.lines.next(),
		}
	}
}
