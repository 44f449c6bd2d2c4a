mod decode_column;
mod decode_entity;

use proc_macro::TokenStream;
use syn::{ItemStruct, parse_macro_input};

/// Derive the compile time schema description of an entity struct.
///
/// The first declared field is the primary key. Field attributes:
/// `#[silo(type = "...")]` storage type, `#[silo(with = "...")]`
/// constraint clause, `#[silo(foreign_key)]` marks a field whose type is
/// another entity, `#[silo(primary_key)]` is accepted on the first field
/// for documentation purposes.
#[proc_macro_derive(Entity, attributes(silo))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    decode_entity::expand(&item).into()
}
