//! Enum-specific `Maskable` derivation.
//!
//! Members of all variants share one member list, numbered across variants in
//! declaration order. Each variant gets a match arm that masks its own members
//! and rebuilds the same variant.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{ext::IdentExt, spanned::Spanned, DataEnum, Fields, Result};

use crate::{
    transform::{generate_member_transform, member_binding, DeriveContext},
    DeriveOutput,
};

pub(crate) fn derive_enum(
    data: DataEnum,
    generics: &syn::Generics,
    crate_root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut ctx = DeriveContext::new(generics, crate_root);
    let mut arms = Vec::new();

    for variant in data.variants {
        let arm = match variant.fields {
            Fields::Unit => derive_unit_variant(&variant.ident),
            Fields::Named(fields) => derive_named_variant(&mut ctx, &variant.ident, fields)?,
            Fields::Unnamed(fields) => derive_unnamed_variant(&mut ctx, &variant.ident, fields)?,
        };
        arms.push(arm);
    }

    let mask_body = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#arms),*
            }
        }
    };

    Ok(DeriveOutput {
        descriptors: ctx.descriptors,
        mask_body,
        used_generics: ctx.used_generics,
    })
}

fn derive_unit_variant(variant_ident: &Ident) -> TokenStream {
    quote! {
        Self::#variant_ident => ::core::result::Result::Ok(Self::#variant_ident)
    }
}

fn derive_named_variant(
    ctx: &mut DeriveContext<'_>,
    variant_ident: &Ident,
    fields: syn::FieldsNamed,
) -> Result<TokenStream> {
    let mut bindings = Vec::new();
    let mut transforms = Vec::new();

    for field in fields.named {
        let span = field.span();
        let Some(ident) = field.ident else {
            return Err(syn::Error::new(span, "named field without an identifier"));
        };
        let name = ident.unraw().to_string();
        let binding = member_binding(&name);
        let transform =
            generate_member_transform(ctx, &name, &binding, &field.ty, &field.attrs, span)?;
        transforms.push(quote! { #ident: #transform });
        bindings.push(quote! { #ident: #binding });
    }

    Ok(quote! {
        Self::#variant_ident { #(#bindings),* } => {
            ::core::result::Result::Ok(Self::#variant_ident { #(#transforms),* })
        }
    })
}

fn derive_unnamed_variant(
    ctx: &mut DeriveContext<'_>,
    variant_ident: &Ident,
    fields: syn::FieldsUnnamed,
) -> Result<TokenStream> {
    let mut bindings = Vec::new();
    let mut transforms = Vec::new();

    for (index, field) in fields.unnamed.into_iter().enumerate() {
        let span = field.span();
        let name = index.to_string();
        let binding = member_binding(&name);
        let transform =
            generate_member_transform(ctx, &name, &binding, &field.ty, &field.attrs, span)?;
        transforms.push(transform);
        bindings.push(binding);
    }

    Ok(quote! {
        Self::#variant_ident ( #(#bindings),* ) => {
            ::core::result::Result::Ok(Self::#variant_ident ( #(#transforms),* ))
        }
    })
}
