pub mod mappings;

pub mod names {
	use std::fmt::{Debug, Formatter};
	use anyhow::{bail, Result};

	/// The names of the two namespaces of a [`MappingSet`][crate::tree::mappings::MappingSet]: the obfuscated one
	/// and the deobfuscated one.
	#[derive(Clone, PartialEq)]
	pub struct Namespaces {
		names: [String; 2],
	}

	impl Namespaces {
		pub fn new(obfuscated: impl Into<String>, deobfuscated: impl Into<String>) -> Result<Namespaces> {
			let names = [obfuscated.into(), deobfuscated.into()];
			if names[0].is_empty() || names[1].is_empty() {
				bail!("namespace names must not be empty: {names:?}");
			}
			if names[0] == names[1] {
				bail!("duplicate namespace name {:?}", names[0]);
			}
			Ok(Namespaces { names })
		}

		pub fn obfuscated(&self) -> &str {
			&self.names[0]
		}

		pub fn deobfuscated(&self) -> &str {
			&self.names[1]
		}

		pub(crate) fn names(&self) -> &[String; 2] {
			&self.names
		}

		/// Checks that the namespaces are exactly the given ones, in this order.
		pub fn check_that(&self, names: [&str; 2]) -> Result<()> {
			if self.names != names {
				bail!("namespaces don't match, expected {:?}, found {:?}", names, self.names);
			}
			Ok(())
		}
	}

	impl Default for Namespaces {
		fn default() -> Self {
			Namespaces { names: ["official".to_owned(), "named".to_owned()] }
		}
	}

	impl Debug for Namespaces {
		fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
			write!(f, "Namespaces {:?}", self.names)
		}
	}

	impl TryFrom<Vec<String>> for Namespaces {
		type Error = anyhow::Error;

		fn try_from(value: Vec<String>) -> Result<Self> {
			let [obfuscated, deobfuscated] = <[String; 2]>::try_from(value)
				.map_err(|vec| anyhow::anyhow!("expected exactly two namespaces, got {}: {vec:?}", vec.len()))?;
			Namespaces::new(obfuscated, deobfuscated)
		}
	}
}
