use darling::FromDeriveInput;
use darling::ast::Data;
use proc_macro2::TokenStream;
use quote::quote;

use crate::field::{Field, collect_fields};
use crate::schema::{validate_enum, validate_struct};
use crate::utils::{SchemaInput, read_declaration};

fn generate_decode_field(field: &Field) -> TokenStream {
    let ident = field.ident;
    let key = &field.key;

    if field.optional {
        quote! {
            #ident: match object.remove(#key) {
                Some(value) => Some(::zeropack::traits::Decode::from_value(value)?),
                None => None,
            },
        }
    } else {
        quote! {
            #ident: ::zeropack::traits::Decode::from_value(
                object.remove(#key).ok_or_else(|| ::zeropack::DecodeError::MissingField(#key.to_string()))?,
            )?,
        }
    }
}

#[inline]
pub fn decode(input: syn::DeriveInput) -> TokenStream {
    let input = match SchemaInput::from_derive_input(&input) {
        Ok(input) => input,
        Err(err) => return err.write_errors(),
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let declaration = match input.path.as_deref().map(read_declaration).transpose() {
        Ok(declaration) => declaration,
        Err(err) => {
            let err = err.to_string();
            return quote! {
                compile_error!(#err);
            };
        }
    };

    match &input.data {
        Data::Struct(fields) => {
            let fields = match collect_fields(&fields.fields) {
                Ok(fields) => fields,
                Err(err) => return quote! { compile_error!(#err); },
            };

            if let Some(declaration) = &declaration {
                if let Err(err) = validate_struct(declaration, &fields) {
                    return quote! {
                        compile_error!(concat!("Schema validation error: ", #err));
                    };
                }
            }

            let field_reads = fields.iter().map(generate_decode_field).collect::<Vec<_>>();

            quote! {
                impl #impl_generics ::zeropack::traits::Decode for #name #ty_generics #where_clause {
                    fn from_value(value: ::zeropack::Value) -> Result<Self, ::zeropack::DecodeError> {
                        #[allow(unused_mut, unused_variables)]
                        let mut object = value.into_object()?;
                        Ok(Self {
                            #(#field_reads)*
                        })
                    }
                }
            }
        }
        Data::Enum(variants) => {
            if let Some(declaration) = &declaration {
                if let Err(err) = validate_enum(declaration) {
                    return quote! {
                        compile_error!(concat!("Schema validation error: ", #err));
                    };
                }
            }

            let match_arms = variants.iter().enumerate().map(|(index, variant)| {
                let variant_name = &variant.ident;
                let index = index as i64;
                quote! {
                    #index => Ok(#name::#variant_name),
                }
            }).collect::<Vec<_>>();

            quote! {
                impl #impl_generics ::zeropack::traits::Decode for #name #ty_generics #where_clause {
                    fn from_value(value: ::zeropack::Value) -> Result<Self, ::zeropack::DecodeError> {
                        match <i64 as ::zeropack::traits::Decode>::from_value(value)? {
                            #(#match_arms)*
                            other => Err(::zeropack::DecodeError::OutOfBounds(format!(
                                "{} is not a variant index of {}",
                                other,
                                stringify!(#name),
                            ))),
                        }
                    }
                }
            }
        }
    }
}
