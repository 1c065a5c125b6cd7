//! Field-level data masking for structured values.
//!
//! `masker` produces a copy of a value in which sensitive fields are replaced
//! by pluggable strategies, leaving everything else untouched. It is meant to
//! run at the boundary, before a value is logged, serialized or displayed.
//!
//! Which fields are sensitive is decided by:
//! - **Annotations** on struct and enum members: `#[mask("filled4")]`.
//! - **Field rules** on the masker: every member or string map key named
//!   `password` gets `filled4`, whatever type it lives in.
//!
//! How a field is masked is decided by the **strategy** named in the
//! annotation, looked up by the value's category (string, signed, unsigned,
//! float, any). Built-ins: `hash`, `fixed`, `filled`, `random`, `zero`,
//! `preserveEnds`. Custom strategies are plain functions.
//!
//! ```ignore
//! use masker::Maskable;
//!
//! #[derive(Maskable)]
//! struct Login {
//!     username: String,
//!     #[mask("preserveEnds(2,2)")]
//!     email: String,
//!     password: String,
//! }
//!
//! let masked = masker::mask(&login)?;
//! ```
//!
//! Key rules:
//! - An explicit annotation always wins over a field rule.
//! - Annotations apply to leaves only. On a nested struct, sequence or map
//!   they are reported as a warning and the value is walked instead.
//! - `Option`, `Box`, `Rc` and `Arc` pass annotations to their contents.
//! - Map keys are never masked.
//! - Any strategy error aborts the call; no partially masked value escapes.
//!
//! What this crate does not do:
//! - encrypt or tokenize reversibly
//! - install a logger (integrations sit behind feature flags, e.g. `slog`)

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else,
    clippy::clone_on_copy
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use masker_derive::Maskable;

#[allow(unused_extern_crates)]
extern crate self as masker;

// Module declarations
mod annotation;
mod config;
mod engine;
mod error;
mod metadata;
mod rules;
mod strategy;
mod traverse;
#[cfg(feature = "slog")]
pub mod slog;

// Re-exports
pub use annotation::Annotation;
pub use config::MaskerConfig;
pub use engine::{
    default_masker, mask, set_default, Masker, DEFAULT_ANNOTATION_KEY, DEFAULT_MASK_CHAR,
};
pub use error::{FieldPath, MaskError, MaskWarning, PathSegment, StrategyFailure};
pub use metadata::{
    AnnotationSource, MemberDescriptor, MemberMetadata, MetadataCache, TypeMetadata,
};
pub use rules::{FieldRules, DEFAULT_FIELD_RULES};
pub use strategy::{
    builtin as strategies, Category, Primitive, StrategyContext, StrategyFn, StrategyRegistry,
};
pub use traverse::{Leaf, Maskable, Masked, Shape, Walker};
