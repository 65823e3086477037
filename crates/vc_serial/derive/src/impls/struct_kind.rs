use proc_macro2::TokenStream;
use quote::quote;
use syn::{WherePredicate, parse_quote};

use crate::derive_data::{FieldMode, SerialStruct};

/// Implements `Described` and `Serial` for a struct with named fields.
pub(crate) fn impl_struct(info: &SerialStruct, vc_serial_path: &syn::Path) -> TokenStream {
    let serial_ = crate::path::serial_(vc_serial_path);
    let described_ = crate::path::described_(vc_serial_path);
    let grammar_ = crate::path::grammar_(vc_serial_path);
    let result_ = crate::path::result_(vc_serial_path);
    let exports_ = crate::path::macro_exports_(vc_serial_path);

    // Field types are not bounded, so recursive types stay solvable. An
    // extended field can never mention `Self`, so its bound is safe.
    let bounds: Vec<WherePredicate> = info
        .fields
        .iter()
        .filter_map(|field| {
            let ty = &field.data.ty;
            match field.mode {
                FieldMode::Extend(_) => Some(parse_quote!(#ty: #described_)),
                FieldMode::Define(_) | FieldMode::Skip => None,
            }
        })
        .collect();
    let generics = super::bounded_generics(info.generics, &serial_, bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let ident = info.ident;

    let registrations = info.fields.iter().filter_map(|field| {
        let member = field.ident;
        let key = member.to_string();
        let accessor = quote! {
            #exports_::Accessor::new(
                #key,
                |owner: &Self| &owner.#member,
                |owner: &mut Self| &mut owner.#member,
            )
        };

        match &field.mode {
            FieldMode::Define(name) => Some(quote! {
                members.define(#name, #accessor)?;
            }),
            FieldMode::Extend(label) => Some(quote! {
                members.extend(#label, #accessor)?;
            }),
            FieldMode::Skip => None,
        }
    });

    quote! {
        impl #impl_generics #described_ for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn describe(
                members: &mut #exports_::MemberBuilder<Self>,
            ) -> ::core::result::Result<(), #exports_::RegistryError> {
                #(#registrations)*
                ::core::result::Result::Ok(())
            }
        }

        impl #impl_generics #serial_ for #ident #ty_generics #where_clause {
            #[inline]
            fn serialize(&self, grammar: &mut dyn #grammar_) -> #result_<()> {
                #exports_::serialize_described(self, grammar)
            }

            #[inline]
            fn deserialize(&mut self, grammar: &mut dyn #grammar_) -> #result_<()> {
                #exports_::deserialize_described(self, grammar)
            }
        }
    }
}
