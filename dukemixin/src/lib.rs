//! Remapping of mixin classes.
//!
//! Mixins refer to the members of their target classes by strings in annotations, like
//! `@Inject(method = "hhj", at = @At(value = "INVOKE", target = "Lhj;gyhu()V"))`. When the target classes get
//! deobfuscated, these strings and the names of `@Shadow`, `@Overwrite`, `@Accessor` and `@Invoker` members must
//! follow.
//!
//! The source files come in as a [declaration graph][declaration::SourceUnit], already parsed. The
//! [`engine::MixinRemapper`] resolves the [linkages][linkage::Linkage] against a
//! [`MappingSet`][quill::tree::mappings::MappingSet], adding the mappings for the mixin members, and plans the
//! [rewrites of string literals][planner::RewriteInstruction].

pub mod annotation;
pub mod cleaner;
pub mod constants;
pub mod declaration;
pub mod diagnostic;
pub mod engine;
pub mod inflector;
pub mod linkage;
pub mod planner;
