// -----------------------------------------------------------------------------
// Modules

mod enum_kind;
mod struct_kind;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, WherePredicate, parse_quote};

use crate::derive_data::SerialDerive;

/// Provided for `#[derive(Serial)]`.
pub(crate) fn match_serial_impls(ast: &DeriveInput) -> TokenStream {
    let serial_derive = match SerialDerive::from_input(ast) {
        Ok(val) => val,
        Err(err) => return err.into_compile_error().into(),
    };

    let vc_serial_path = crate::path::vc_serial();

    let serial_impls: proc_macro2::TokenStream = match serial_derive {
        SerialDerive::Struct(info) => struct_kind::impl_struct(&info, &vc_serial_path),
        SerialDerive::Enum(info) => enum_kind::impl_enum(&info, &vc_serial_path),
    };

    TokenStream::from(quote! {
        const _: () = {
            #serial_impls
        };
    })
}

/// Copies `generics`, bounding every type parameter by
/// `Serial + Default + 'static` and appending `extra`.
///
/// Only parameters are bounded, never field types: a bound such as
/// `Vec<Self>: Serial` would send the trait solver into a loop.
fn bounded_generics(
    generics: &Generics,
    serial_: &proc_macro2::TokenStream,
    extra: impl IntoIterator<Item = WherePredicate>,
) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();

    let where_clause = generics.make_where_clause();
    for ident in params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: #serial_ + ::core::default::Default + 'static));
    }
    where_clause.predicates.extend(extra);

    generics
}
