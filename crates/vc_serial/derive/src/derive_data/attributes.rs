//! Parsing of `#[serial(...)]` attributes.

use syn::{Attribute, LitStr, Token};

use crate::SERIAL_ATTRIBUTE_NAME;

/// What the macro does with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldMode {
    /// Registered under a document name.
    Define(String),
    /// Flattened; the string is the extension label.
    Extend(String),
    /// Not registered.
    Skip,
}

/// Attributes of one struct field.
///
/// - `#[serial(rename = "...")]`
/// - `#[serial(skip)]`
/// - `#[serial(extend)]` or `#[serial(extend = "Label")]`
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub skip: bool,
    pub extend: Option<Option<LitStr>>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(SERIAL_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if out.rename.is_some() {
                        return Err(meta.error("duplicate `rename`"));
                    }
                    out.rename = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("skip") {
                    out.skip = true;
                } else if meta.path.is_ident("extend") {
                    if out.extend.is_some() {
                        return Err(meta.error("duplicate `extend`"));
                    }
                    let label = if meta.input.peek(Token![=]) {
                        Some(meta.value()?.parse()?)
                    } else {
                        None
                    };
                    out.extend = Some(label);
                } else {
                    return Err(meta.error("expected `rename`, `skip` or `extend`"));
                }
                Ok(())
            })?;
        }

        Ok(out)
    }

    /// Resolves the attributes of a field called `ident`.
    pub fn mode(&self, ident: &syn::Ident, span: proc_macro2::Span) -> syn::Result<FieldMode> {
        match (self.skip, &self.extend, &self.rename) {
            (true, None, None) => Ok(FieldMode::Skip),
            (true, ..) => Err(syn::Error::new(span, "`skip` cannot be combined with other options")),
            (false, Some(_), Some(_)) => Err(syn::Error::new(
                span,
                "`extend` fields have no name of their own; remove `rename`",
            )),
            (false, Some(label), None) => Ok(FieldMode::Extend(
                label
                    .as_ref()
                    .map_or_else(|| ident.to_string(), LitStr::value),
            )),
            (false, None, rename) => Ok(FieldMode::Define(
                rename
                    .as_ref()
                    .map_or_else(|| ident.to_string(), LitStr::value),
            )),
        }
    }
}

/// Attributes of one enum variant: `#[serial(rename = "...")]`.
#[derive(Debug, Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(SERIAL_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if out.rename.is_some() {
                        return Err(meta.error("duplicate `rename`"));
                    }
                    out.rename = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `rename`"))
                }
            })?;
        }

        Ok(out)
    }
}

/// Rejects `#[serial(...)]` on the type itself.
pub(crate) fn reject_type_attrs(attrs: &[Attribute]) -> syn::Result<()> {
    match attrs
        .iter()
        .find(|attr| attr.path().is_ident(SERIAL_ATTRIBUTE_NAME))
    {
        Some(attr) => Err(syn::Error::new_spanned(
            attr,
            "`#[serial(...)]` is only supported on fields and variants",
        )),
        None => Ok(()),
    }
}
