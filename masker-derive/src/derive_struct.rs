//! Struct-specific `Maskable` derivation.
//!
//! This module destructures `self`, masks each member in declaration order and
//! rebuilds the struct from the masked members.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, spanned::Spanned, DataStruct, Fields, Result};

use crate::{
    transform::{generate_member_transform, member_binding, DeriveContext},
    DeriveOutput,
};

pub(crate) fn derive_struct(
    data: DataStruct,
    generics: &syn::Generics,
    crate_root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut ctx = DeriveContext::new(generics, crate_root);

    let mask_body = match data.fields {
        Fields::Named(fields) => {
            let mut bindings = Vec::new();
            let mut transforms = Vec::new();
            for field in fields.named {
                let span = field.span();
                let Some(ident) = field.ident else {
                    return Err(syn::Error::new(span, "named field without an identifier"));
                };
                let name = ident.unraw().to_string();
                let binding = member_binding(&name);
                let transform = generate_member_transform(
                    &mut ctx,
                    &name,
                    &binding,
                    &field.ty,
                    &field.attrs,
                    span,
                )?;
                transforms.push(quote! { #ident: #transform });
                bindings.push(quote! { #ident: #binding });
            }
            quote! {
                let Self { #(#bindings),* } = self;
                ::core::result::Result::Ok(Self { #(#transforms),* })
            }
        }
        Fields::Unnamed(fields) => {
            let mut bindings = Vec::new();
            let mut transforms = Vec::new();
            for (index, field) in fields.unnamed.into_iter().enumerate() {
                let span = field.span();
                let name = index.to_string();
                let binding = member_binding(&name);
                let transform = generate_member_transform(
                    &mut ctx,
                    &name,
                    &binding,
                    &field.ty,
                    &field.attrs,
                    span,
                )?;
                transforms.push(transform);
                bindings.push(binding);
            }
            quote! {
                let Self ( #(#bindings),* ) = self;
                ::core::result::Result::Ok(Self ( #(#transforms),* ))
            }
        }
        Fields::Unit => quote! {
            ::core::result::Result::Ok(Self)
        },
    };

    Ok(DeriveOutput {
        descriptors: ctx.descriptors,
        mask_body,
        used_generics: ctx.used_generics,
    })
}
