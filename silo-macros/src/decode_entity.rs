use crate::decode_column::{ColumnMetadata, decode_column};
use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

pub(crate) fn expand(item: &ItemStruct) -> TokenStream {
    let name = &item.ident;
    let table = name.to_string().to_case(Case::Snake);
    if item.fields.is_empty() {
        panic!("Entity `{name}` needs at least one field, the primary key");
    }
    let columns: Vec<ColumnMetadata> = item
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| decode_column(field, index, &table))
        .collect();
    let defs = columns.iter().map(encode_column_def);
    let values = columns.iter().map(|column| {
        let ident = &column.ident;
        match &column.foreign_type {
            Some(..) => quote!(::silo::Entity::primary_key_value(&self.#ident)),
            None => quote!(::silo::Value::from(self.#ident.clone())),
        }
    });
    let set_arms = columns.iter().enumerate().map(|(index, column)| {
        let ident = &column.ident;
        match &column.variant {
            // A foreign key value lands in the nested entity's primary key.
            None => quote!(#index => return ::silo::Entity::set(&mut self.#ident, 0, value),),
            Some(variant) => {
                let field = &column.field;
                quote! {
                    #index => match value {
                        #variant(v) => self.#ident = v,
                        v => {
                            return Err(::silo::Error::Scan(format!(
                                "cannot assign {:?} to `{}.{}`",
                                v, #table, #field,
                            )))
                        }
                    },
                }
            }
        }
    });
    let primary_key = &columns[0].ident;
    quote! {
        impl ::silo::Entity for #name {
            fn table_name() -> &'static str {
                #table
            }

            fn columns() -> &'static [::silo::ColumnDef] {
                static COLUMNS: &[::silo::ColumnDef] = &[#(#defs),*];
                COLUMNS
            }

            fn row(&self) -> Vec<::silo::Value> {
                vec![#(#values),*]
            }

            fn set(&mut self, index: usize, value: ::silo::Value) -> ::silo::Result<()> {
                match index {
                    #(#set_arms)*
                    _ => {
                        return Err(::silo::Error::Scan(format!(
                            "field index {} out of range for `{}`",
                            index, #table,
                        )))
                    }
                }
                Ok(())
            }

            fn primary_key_value(&self) -> ::silo::Value {
                ::silo::Value::from(self.#primary_key.clone())
            }
        }
    }
}

fn encode_column_def(column: &ColumnMetadata) -> TokenStream {
    let ColumnMetadata {
        name,
        field,
        type_name,
        tag,
        column_type,
        with,
        primary_key,
        ..
    } = column;
    let references = match &column.foreign_type {
        Some(ty) => {
            let table = type_name.to_case(Case::Snake);
            let key = format!("{table}_id");
            quote! {
                Some(::silo::ForeignKey {
                    table: #table,
                    key: #key,
                    columns: <#ty as ::silo::Entity>::columns,
                })
            }
        }
        None => quote!(None),
    };
    quote! {
        ::silo::ColumnDef {
            name: #name,
            field: #field,
            type_name: #type_name,
            tag: #tag,
            column_type: #column_type,
            with: #with,
            primary_key: #primary_key,
            references: #references,
        }
    }
}
