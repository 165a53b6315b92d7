//! Entity derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Ident, Result};

/// Parsed `#[dbtemplate(...)]` configuration for one field
struct FieldConfig {
    /// The field identifier
    ident: Ident,
    /// Column name to match (may be renamed)
    column_name: String,
    /// Whether the field has no mutator
    skip: bool,
    /// The field type
    ty: syn::Type,
}

fn parse_field_config(field: &Field) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let mut column_name = ident.to_string();
    // Raw identifiers such as `r#type` match the column `type`
    if let Some(stripped) = column_name.strip_prefix("r#") {
        column_name = stripped.to_string();
    }
    let mut skip = false;

    for attr in &field.attrs {
        if attr.path().is_ident("dbtemplate") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    column_name = lit.value();
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown dbtemplate attribute `{}`",
                        meta.path
                            .get_ident()
                            .map(|i| i.to_string())
                            .unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }
    }

    Ok(FieldConfig {
        ident,
        column_name,
        skip,
        ty: field.ty.clone(),
    })
}

pub fn derive_entity_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    let field_configs: Vec<FieldConfig> = fields
        .iter()
        .map(parse_field_config)
        .collect::<Result<Vec<_>>>()?;

    // Skipped fields have no mutator and never appear in the table
    let settable: Vec<&FieldConfig> = field_configs.iter().filter(|c| !c.skip).collect();

    let column_names: Vec<&str> = settable.iter().map(|c| c.column_name.as_str()).collect();

    let assignments: Vec<TokenStream> = settable
        .iter()
        .enumerate()
        .map(|(index, config)| {
            let field_ident = &config.ident;
            let ty = &config.ty;
            quote! {
                #index => {
                    self.#field_ident = <#ty as dbtemplate::FromValue>::from_value(value)?;
                }
            }
        })
        .collect();

    let expanded = quote! {
        impl #impl_generics dbtemplate::Entity for #name #ty_generics #where_clause {
            fn fields() -> &'static [&'static str] {
                &[#(#column_names),*]
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                index: usize,
                value: dbtemplate::Value,
            ) -> dbtemplate::Result<()> {
                match index {
                    #(#assignments)*
                    _ => {}
                }
                Ok(())
            }
        }
    };

    Ok(expanded)
}
