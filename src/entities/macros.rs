//! Macros for reducing boilerplate when defining resources
//!
//! These generate the repetitive parts of each `Resource` implementation.

/// Implement `Resource::meta` and `Resource::meta_mut` for a struct with a
/// `meta: ResourceMeta` field
///
/// # Example
/// ```rust,ignore
/// impl Resource for Address {
///     resource_meta!();
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! resource_meta {
    () => {
        fn meta(&self) -> &$crate::core::resource::ResourceMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut $crate::core::resource::ResourceMeta {
            &mut self.meta
        }
    };
}

/// Copy every `Some` field of a patch onto the target
///
/// Fields left as `None` in the patch keep their current value. Optional
/// target fields are listed after a `;` and are set to `Some(value)`.
///
/// # Example
/// ```rust,ignore
/// apply_fields!(self, patch; street, city; region);
/// ```
#[macro_export]
macro_rules! apply_fields {
    ($target:expr, $patch:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )*
    };
    ($target:expr, $patch:expr; $($field:ident),* ; $($optional:ident),+ $(,)?) => {
        $crate::apply_fields!($target, $patch; $($field),*);
        $(
            if let Some(value) = &$patch.$optional {
                $target.$optional = Some(value.clone());
            }
        )+
    };
}
