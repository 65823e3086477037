use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, Generics, Ident, Variant};

use super::FieldMode;
use super::attributes::{FieldAttributes, VariantAttributes, reject_type_attrs};

// -----------------------------------------------------------------------------
// Define

/// A parsed `#[derive(Serial)]` input.
pub(crate) enum SerialDerive<'a> {
    Struct(SerialStruct<'a>),
    Enum(SerialEnum<'a>),
}

pub(crate) struct SerialStruct<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub fields: Vec<StructField<'a>>,
}

pub(crate) struct StructField<'a> {
    pub data: &'a Field,
    pub ident: &'a Ident,
    pub mode: FieldMode,
}

pub(crate) struct SerialEnum<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub variants: Vec<EnumVariant<'a>>,
}

pub(crate) struct EnumVariant<'a> {
    pub data: &'a Variant,
    pub name: String,
}

// -----------------------------------------------------------------------------
// Parsing

impl<'a> SerialDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        reject_type_attrs(&input.attrs)?;

        match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => {
                    let fields = named
                        .named
                        .iter()
                        .map(StructField::new)
                        .collect::<syn::Result<Vec<_>>>()?;

                    Ok(Self::Struct(SerialStruct {
                        ident: &input.ident,
                        generics: &input.generics,
                        fields,
                    }))
                }
                Fields::Unnamed(_) => Err(syn::Error::new(
                    input.ident.span(),
                    "`Serial` cannot be derived for tuple structs; use named fields",
                )),
                Fields::Unit => Err(syn::Error::new(
                    input.ident.span(),
                    "`Serial` cannot be derived for unit structs",
                )),
            },
            Data::Enum(data) => {
                let variants = data
                    .variants
                    .iter()
                    .map(EnumVariant::new)
                    .collect::<syn::Result<Vec<_>>>()?;

                Ok(Self::Enum(SerialEnum {
                    ident: &input.ident,
                    generics: &input.generics,
                    variants,
                }))
            }
            Data::Union(data) => Err(syn::Error::new(
                data.union_token.span(),
                "`Serial` cannot be derived for unions",
            )),
        }
    }
}

impl<'a> StructField<'a> {
    fn new(data: &'a Field) -> syn::Result<Self> {
        let attrs = FieldAttributes::parse_attrs(&data.attrs)?;
        let ident = data
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(data.span(), "expected a named field"))?;
        let mode = attrs.mode(ident, data.span())?;

        Ok(Self { data, ident, mode })
    }
}

impl<'a> EnumVariant<'a> {
    fn new(data: &'a Variant) -> syn::Result<Self> {
        if !matches!(data.fields, Fields::Unit) {
            return Err(syn::Error::new(
                data.span(),
                "`Serial` only supports enum variants without data",
            ));
        }
        let attrs = VariantAttributes::parse_attrs(&data.attrs)?;
        let name = attrs
            .rename
            .map_or_else(|| data.ident.to_string(), |lit| lit.value());

        Ok(Self { data, name })
    }
}
