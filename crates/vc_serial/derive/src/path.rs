//! Paths to items of `vc_serial` as seen from the invoking crate.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `vc_serial` crate.
///
/// 1. For crates that depend on `vc_serial`, `::vc_serial` is returned.
/// 2. For crates that depend on `vc_persist`, `::vc_persist::serial` is returned.
/// 3. For other situations, `::vc_serial` is returned, but this may be incorrect.
///
/// Reading the manifest is not cheap, so the path is resolved once per macro
/// invocation and passed around.
pub(crate) fn vc_serial() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_serial"))
}

#[inline(always)]
pub(crate) fn macro_exports_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_serial_path::__macro_exports
    }
}

#[inline(always)]
pub(crate) fn serial_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_serial_path::Serial
    }
}

#[inline(always)]
pub(crate) fn grammar_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_serial_path::Grammar
    }
}

#[inline(always)]
pub(crate) fn result_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_serial_path::Result
    }
}

#[inline(always)]
pub(crate) fn described_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_serial_path::Described
    }
}

#[inline(always)]
pub(crate) fn enumerated_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_serial_path::Enumerated
    }
}
