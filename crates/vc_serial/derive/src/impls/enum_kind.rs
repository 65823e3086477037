use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::SerialEnum;

/// Implements `Enumerated` and `Serial` for a fieldless enum.
pub(crate) fn impl_enum(info: &SerialEnum, vc_serial_path: &syn::Path) -> TokenStream {
    let serial_ = crate::path::serial_(vc_serial_path);
    let enumerated_ = crate::path::enumerated_(vc_serial_path);
    let grammar_ = crate::path::grammar_(vc_serial_path);
    let result_ = crate::path::result_(vc_serial_path);
    let exports_ = crate::path::macro_exports_(vc_serial_path);

    let generics = super::bounded_generics(info.generics, &serial_, core::iter::empty());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let ident = info.ident;

    let variants = info.variants.iter().map(|variant| {
        let name = &variant.name;
        let value = &variant.data.ident;
        quote! {
            table.variant(#name, Self::#value)?;
        }
    });

    quote! {
        impl #impl_generics #enumerated_ for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn describe(
                table: &mut #exports_::EnumTableBuilder<Self>,
            ) -> ::core::result::Result<(), #exports_::RegistryError> {
                #(#variants)*
                ::core::result::Result::Ok(())
            }
        }

        impl #impl_generics #serial_ for #ident #ty_generics #where_clause {
            #[inline]
            fn serialize(&self, grammar: &mut dyn #grammar_) -> #result_<()> {
                #exports_::serialize_enumerated(self, grammar)
            }

            #[inline]
            fn deserialize(&mut self, grammar: &mut dyn #grammar_) -> #result_<()> {
                #exports_::deserialize_enumerated(self, grammar)
            }
        }
    }
}
