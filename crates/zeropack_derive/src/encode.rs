use darling::FromDeriveInput;
use darling::ast::Data;
use proc_macro2::TokenStream;
use quote::quote;

use crate::field::{Field, collect_fields};
use crate::schema::{validate_enum, validate_struct};
use crate::utils::{SchemaInput, read_declaration};

fn generate_encode_field(field: &Field) -> TokenStream {
    let ident = field.ident;
    let key = &field.key;

    if field.optional {
        quote! {
            if let Some(value) = &self.#ident {
                object.insert(#key.to_string(), ::zeropack::traits::Encode::to_value(value)?);
            }
        }
    } else {
        quote! {
            object.insert(#key.to_string(), ::zeropack::traits::Encode::to_value(&self.#ident)?);
        }
    }
}

#[inline]
pub fn encode(input: syn::DeriveInput) -> TokenStream {
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

            let field_inserts = fields.iter().map(generate_encode_field).collect::<Vec<_>>();

            quote! {
                impl #impl_generics ::zeropack::traits::Encode for #name #ty_generics #where_clause {
                    fn to_value(&self) -> Result<::zeropack::Value, ::zeropack::EncodeError> {
                        let mut object = ::zeropack::Object::new();
                        #(#field_inserts)*
                        Ok(::zeropack::Value::Object(object))
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
                    #name::#variant_name => Ok(::zeropack::Value::Int(#index)),
                }
            }).collect::<Vec<_>>();

            quote! {
                impl #impl_generics ::zeropack::traits::Encode for #name #ty_generics #where_clause {
                    fn to_value(&self) -> Result<::zeropack::Value, ::zeropack::EncodeError> {
                        match *self {
                            #(#match_arms)*
                        }
                    }
                }
            }
        }
    }
}
