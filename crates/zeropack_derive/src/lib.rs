mod decode;
mod encode;
mod field;
mod schema;
mod utils;

use proc_macro::TokenStream;
use syn::parse_macro_input;

/// Implements `zeropack::traits::Encode`.
///
/// Structs with named fields become objects keyed by the camelCase field
/// name (or `#[schema(rename = "...")]`), with `Option` fields optional.
/// Unit enums become their variant index. `#[schema(path = "...")]` checks
/// the type against a JSON declaration at compile time.
#[proc_macro_derive(Encode, attributes(schema))]
pub fn encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    encode::encode(input).into()
}

/// Implements `zeropack::traits::Decode`. See [`macro@Encode`] for the mapping.
#[proc_macro_derive(Decode, attributes(schema))]
pub fn decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    decode::decode(input).into()
}
