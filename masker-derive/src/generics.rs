//! Generic type parameter handling and trait bound management.
//!
//! `Maskable` types are keyed by `TypeId` in the metadata cache, so every type
//! parameter must be `'static`. Parameters that appear in member types also
//! need `Maskable`, because every member is walked.
//!
//! ## PhantomData Handling
//!
//! `PhantomData<T>` members are skipped when collecting generics:
//!
//! ```ignore
//! struct TypedId<T> {
//!     id: String,
//!     _marker: PhantomData<T>,  // T should NOT require Maskable
//! }
//! ```
//!
//! `PhantomData<T>` is always a pass-through member, so `TypedId<Uuid>` works
//! even though `Uuid` does not implement `Maskable`.

use proc_macro2::TokenStream;
use syn::{parse_quote, spanned::Spanned, Ident};

pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    match ty {
        syn::Type::Path(path) => {
            if let Some(qself) = &path.qself {
                collect_generics_from_type(&qself.ty, generics, result);
            }
            for segment in &path.path.segments {
                if segment.ident == "PhantomData" {
                    return;
                }

                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    for arg in &args.args {
                        if let syn::GenericArgument::Type(inner_ty) = arg {
                            collect_generics_from_type(inner_ty, generics, result);
                        }
                    }
                }
            }

            if let Some(first) = path.path.segments.first() {
                for param in generics.type_params() {
                    if first.ident == param.ident && !result.iter().any(|g| g == &param.ident) {
                        result.push(param.ident.clone());
                    }
                }
            }
        }
        syn::Type::Array(array) => collect_generics_from_type(&array.elem, generics, result),
        syn::Type::Slice(slice) => collect_generics_from_type(&slice.elem, generics, result),
        syn::Type::Paren(paren) => collect_generics_from_type(&paren.elem, generics, result),
        syn::Type::Group(group) => collect_generics_from_type(&group.elem, generics, result),
        syn::Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                collect_generics_from_type(elem, generics, result);
            }
        }
        _ => {}
    }
}

/// Rejects lifetime parameters: masked values must be `'static`.
pub(crate) fn reject_lifetimes(generics: &syn::Generics) -> syn::Result<()> {
    if let Some(lifetime) = generics.lifetimes().next() {
        return Err(syn::Error::new(
            lifetime.span(),
            "`Maskable` cannot be derived for types with lifetime parameters",
        ));
    }
    Ok(())
}

/// Adds `'static` to every type parameter and `Maskable` to the ones used by
/// members.
pub(crate) fn add_maskable_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
    crate_root: &TokenStream,
) -> syn::Generics {
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            param.bounds.push(parse_quote!(#crate_root::Maskable));
        } else {
            param.bounds.push(parse_quote!('static));
        }
    }
    generics
}
