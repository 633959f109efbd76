//! Names and descriptors of the JVM, as used by mappings and mixin annotations.
//!
//! All the names here are newtypes around [`String`] and [`str`] that are checked on construction, see
//! [`tree::class::ClassName`], [`tree::field::FieldName`] and [`tree::method::MethodName`]. The descriptor grammar
//! lives in [`tree::descriptor`].

mod macros;
pub mod tree;
