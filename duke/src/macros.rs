macro_rules! make_display {
	($owned:ident, $borrowed:ident) => {
		impl std::fmt::Display for $owned {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				std::fmt::Display::fmt(self.as_slice(), f)
			}
		}
		impl std::fmt::Display for $borrowed {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(self.as_str())
			}
		}
	}
}

/// Creates implementations for [String]/[str] like types.
///
/// The last line gives the check performed on construction from untrusted input:
/// ```ignore
/// make_string_str_like!(
/// 	pub Owned(String);
/// 	pub OwnedSlice(str);
/// 	is_valid(s) = if s.is_empty() { bail!("empty") } else { Ok(()) };
/// );
/// ```
/// The owned type serializes as a plain string, and deserializing runs the same check.
macro_rules! make_string_str_like {
	(
		$( #[$owned_doc:meta] )*
		$owned_vis:vis $owned:ident ( String ) ;
		$( #[$borrowed_doc:meta] )*
		$borrowed_vis:vis $borrowed:ident ( str ) ;
		is_valid($s:ident) = $check:expr ;
	) => {
		$( #[$owned_doc] )*
		#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
		$owned_vis struct $owned(String);

		$( #[$borrowed_doc] )*
		#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
		#[repr(transparent)]
		$borrowed_vis struct $borrowed(str);

		impl $owned {
			pub fn as_slice(&self) -> &$borrowed {
				self
			}

			pub fn into_inner(self) -> String {
				self.0
			}

			#[doc = concat!("Constructs [`", stringify!($owned), "`] from [`String`] without checking any content.")]
			///
			/// # Safety
			#[doc = concat!("`s` must only contain valid contents for [`", stringify!($owned), "`]. See [`",
				stringify!($owned), "::check_valid`] for the concrete values that are allowed.")]
			pub const unsafe fn from_inner_unchecked(s: String) -> $owned {
				$owned(s)
			}

			/// Checks if a given value is valid for being represented by this type.
			///
			#[doc = concat!("This also applies to the slice type, [`", stringify!($borrowed), "`].")]
			pub fn check_valid($s: &str) -> anyhow::Result<()> {
				$check
			}

			/// Returns `true` if [`Self::check_valid`] accepts the value.
			pub fn is_valid(inner: &str) -> bool {
				Self::check_valid(inner).is_ok()
			}
		}

		impl $borrowed {
			pub fn as_str(&self) -> &str {
				&self.0
			}

			#[doc = concat!("Constructs [`&", stringify!($borrowed), "`][", stringify!($borrowed),
				"] from [`&str`][str] without checking any content.")]
			///
			/// # Safety
			#[doc = concat!("`s` must only contain valid contents for [`", stringify!($borrowed), "`].")]
			#[allow(clippy::needless_lifetimes)]
			pub const unsafe fn from_inner_unchecked<'a>(s: &'a str) -> &'a $borrowed {
				// SAFETY: &'a $borrowed and &'a str have the same layout.
				unsafe { std::mem::transmute::<&'a str, &'a $borrowed>(s) }
			}
		}

		impl AsRef<str> for $borrowed {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		impl AsRef<str> for $owned {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		impl std::borrow::Borrow<$borrowed> for $owned {
			fn borrow(&self) -> &$borrowed {
				// SAFETY: $owned always contains valid content for $borrowed.
				unsafe { $borrowed::from_inner_unchecked(&self.0) }
			}
		}

		impl std::ops::Deref for $owned {
			type Target = $borrowed;

			// deref may be inserted by the compiler at any time
			// therefore the call path must not use deref itself...
			fn deref(&self) -> &Self::Target {
				// SAFETY: $owned always contains valid content for $borrowed.
				unsafe { $borrowed::from_inner_unchecked(&self.0) }
			}
		}

		impl<'a> TryFrom<&'a str> for &'a $borrowed {
			type Error = anyhow::Error;

			fn try_from(value: &'a str) -> anyhow::Result<&'a $borrowed> {
				match $owned::check_valid(value) {
					// SAFETY: We just checked that `value` is valid for $owned.
					Ok(()) => Ok(unsafe { $borrowed::from_inner_unchecked(value) }),
					Err(e) => {
						use anyhow::Context;
						Err(e).with_context(|| anyhow::anyhow!("on value {value:?}"))
					},
				}
			}
		}
		impl TryFrom<String> for $owned {
			type Error = anyhow::Error;

			fn try_from(value: String) -> anyhow::Result<$owned> {
				match $owned::check_valid(&value) {
					// SAFETY: We just checked that `value` is valid for $owned.
					Ok(()) => Ok(unsafe { $owned::from_inner_unchecked(value) }),
					Err(e) => {
						use anyhow::Context;
						Err(e).with_context(|| anyhow::anyhow!("on value {value:?}"))
					},
				}
			}
		}
		impl<'a> TryFrom<&'a str> for $owned {
			type Error = anyhow::Error;

			fn try_from(value: &'a str) -> anyhow::Result<$owned> {
				<&$borrowed>::try_from(value).map(ToOwned::to_owned)
			}
		}

		impl From<$owned> for String {
			fn from(value: $owned) -> Self {
				value.0
			}
		}

		impl std::hash::Hash for $owned {
			fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
				std::hash::Hash::hash(self.as_slice(), state)
			}
		}

		// PartialEq between $borrowed and $owned
		impl PartialEq<$borrowed> for $owned {
			fn eq(&self, other: &$borrowed) -> bool {
				self.0 == other.0
			}
		}
		impl PartialEq<$owned> for $borrowed {
			fn eq(&self, other: &$owned) -> bool {
				self.0 == other.0
			}
		}
		impl<'a> PartialEq<&'a $borrowed> for $owned {
			fn eq(&self, other: &&'a $borrowed) -> bool {
				self.0 == other.0
			}
		}
		impl PartialEq<str> for $borrowed {
			fn eq(&self, other: &str) -> bool {
				&self.0 == other
			}
		}
		impl<'a> PartialEq<&'a str> for $owned {
			fn eq(&self, other: &&'a str) -> bool {
				self.0 == *other
			}
		}

		impl std::borrow::ToOwned for $borrowed {
			type Owned = $owned;

			fn to_owned(&self) -> Self::Owned {
				$owned(self.0.to_owned())
			}
		}

		impl serde::Serialize for $owned {
			fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.serialize_str(&self.0)
			}
		}

		impl<'de> serde::Deserialize<'de> for $owned {
			fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				let string = String::deserialize(deserializer)?;
				<$owned>::try_from(string).map_err(|e| serde::de::Error::custom(format!("{e:#}")))
			}
		}
	}
}

pub(crate) use {make_display, make_string_str_like};
