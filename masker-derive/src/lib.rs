//! Derive macro for `masker`.
//!
//! This crate generates the record traversal behind `#[derive(Maskable)]`. It:
//! - reads `#[mask(...)]` field attributes
//! - emits a `Maskable` implementation that describes the members of the type
//!   and walks them through a `Walker`
//!
//! It does **not** decide which strategy applies to a member. Annotations are
//! carried as plain text and resolved at runtime by the `masker` crate, so
//! field rules, the annotation key and custom strategies stay configurable.

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
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod annotation;
mod derive_enum;
mod derive_struct;
mod generics;
mod transform;
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::{add_maskable_bounds, reject_lifetimes};

/// Derives `masker::Maskable` for structs and enums.
///
/// # Field Attributes
///
/// - **No annotation**: the member is walked. Primitives are copied unless a
///   field rule registered on the `Masker` matches the member name; composite
///   members are traversed so nested sensitive fields are still reached.
///
/// - `#[mask("filled4")]`: annotation text stored under the default key
///   `mask`. The text names a strategy and an optional argument, e.g.
///   `"hash"`, `"filled(4)"`, `"preserveEnds(2,4)"`.
///
/// - `#[mask(log = "zero")]`: annotation text stored under a custom key. The
///   key that is honoured at runtime is chosen with
///   `Masker::set_annotation_key`. Several keys may be combined:
///   `#[mask("filled", log = "zero")]`.
///
/// An explicit annotation always wins over a field rule for the same member.
///
/// Unions and types with lifetime parameters are rejected at compile time.
#[proc_macro_derive(Maskable, attributes(mask))]
pub fn derive_maskable(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the masker crate root.
///
/// Handles crate renaming (e.g., `my_masker = { package = "masker", ... }`)
/// and internal usage (when derive is used inside the masker crate itself).
fn crate_root() -> TokenStream {
    match crate_name("masker") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::masker },
    }
}

/// Output shared by struct and enum derivation.
struct DeriveOutput {
    /// Expressions building one `MemberDescriptor` per member.
    descriptors: Vec<TokenStream>,
    /// Body of `mask_with`, evaluated after `masker_metadata` is bound.
    mask_body: TokenStream,
    /// Generic parameters that appear in member types.
    used_generics: Vec<syn::Ident>,
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    reject_lifetimes(&generics)?;

    let crate_root = crate_root();

    let output = match data {
        Data::Struct(data) => derive_struct(data, &generics, &crate_root)?,
        Data::Enum(data) => derive_enum(data, &generics, &crate_root)?,
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Maskable` cannot be derived for unions",
            ));
        }
    };

    let DeriveOutput {
        descriptors,
        mask_body,
        used_generics,
    } = output;

    let bounded = add_maskable_bounds(generics, &used_generics, &crate_root);
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();

    let metadata_binding = if descriptors.is_empty() {
        quote! { let _ = masker_walker; }
    } else {
        quote! { let masker_metadata = masker_walker.metadata::<Self>(); }
    };

    Ok(quote! {
        impl #impl_generics #crate_root::Maskable for #ident #ty_generics #where_clause {
            fn shape(&self) -> #crate_root::Shape {
                #crate_root::Shape::Record
            }

            fn members() -> ::std::vec::Vec<#crate_root::MemberDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            fn mask_with(
                &self,
                masker_walker: &mut #crate_root::Walker<'_>,
            ) -> ::core::result::Result<Self, #crate_root::MaskError> {
                #metadata_binding
                #mask_body
            }
        }
    })
}
