//! Binary names of the mixin annotations, as they appear in [`Annotation::name`][crate::annotation::Annotation::name].

pub const MIXIN: &str = "org.spongepowered.asm.mixin.Mixin";
pub const SHADOW: &str = "org.spongepowered.asm.mixin.Shadow";
pub const OVERWRITE: &str = "org.spongepowered.asm.mixin.Overwrite";
pub const FINAL: &str = "org.spongepowered.asm.mixin.Final";
pub const MUTABLE: &str = "org.spongepowered.asm.mixin.Mutable";
pub const IMPLEMENTS: &str = "org.spongepowered.asm.mixin.Implements";
pub const INTERFACE: &str = "org.spongepowered.asm.mixin.Interface";

pub const ACCESSOR: &str = "org.spongepowered.asm.mixin.gen.Accessor";
pub const INVOKER: &str = "org.spongepowered.asm.mixin.gen.Invoker";

pub const INJECT: &str = "org.spongepowered.asm.mixin.injection.Inject";
pub const REDIRECT: &str = "org.spongepowered.asm.mixin.injection.Redirect";
pub const MODIFY_CONSTANT: &str = "org.spongepowered.asm.mixin.injection.ModifyConstant";
pub const MODIFY_VARIABLE: &str = "org.spongepowered.asm.mixin.injection.ModifyVariable";
pub const AT: &str = "org.spongepowered.asm.mixin.injection.At";
pub const SLICE: &str = "org.spongepowered.asm.mixin.injection.Slice";

/// The prefix of `@Shadow` members if the annotation doesn't give one.
pub const DEFAULT_SHADOW_PREFIX: &str = "shadow$";

/// The target of an `@Invoker` for a constructor.
pub const CONSTRUCTOR_TARGET: &str = "<init>";
