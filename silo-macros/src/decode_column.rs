use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Field, Ident, LitStr, Type, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    /// Derived column name.
    pub(crate) name: String,
    /// Rust field name.
    pub(crate) field: String,
    /// Rust type name.
    pub(crate) type_name: String,
    /// `::silo::TypeTag::..` path.
    pub(crate) tag: TokenStream,
    /// `::silo::Value::..` variant path, `None` for foreign keys.
    pub(crate) variant: Option<TokenStream>,
    pub(crate) column_type: String,
    pub(crate) with: String,
    pub(crate) primary_key: bool,
    /// Field type when the column is a foreign key.
    pub(crate) foreign_type: Option<Type>,
}

pub(crate) fn decode_column(field: &Field, index: usize, table: &str) -> ColumnMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Entity fields are expected to have a name");
    let field_name = ident.to_string();
    let mut column_type = String::new();
    let mut with = String::new();
    let mut foreign_key = false;
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("silo") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `silo`, use it like: `#[silo(attribute = value, ...)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("type") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `type`, use it like: `#[silo(type = \"char(32)\")]`");
                    };
                    column_type = v.value();
                } else if arg.path.is_ident("with") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `with`, use it like: `#[silo(with = \"NOT NULL\")]`");
                    };
                    with = v.value();
                } else if arg.path.is_ident("primary_key") {
                    let Err(..) = arg.value() else {
                        // value() is Err for Meta::Path
                        panic!("Error while parsing `primary_key`, use it like: `#[silo(primary_key)]`");
                    };
                    if index != 0 {
                        panic!("The primary key must be the first declared field");
                    }
                } else if arg.path.is_ident("foreign_key") {
                    let Err(..) = arg.value() else {
                        panic!("Error while parsing `foreign_key`, use it like: `#[silo(foreign_key)]`");
                    };
                    foreign_key = true;
                } else {
                    panic!(
                        "Unknown attribute `{}` inside silo macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    let primary_key = index == 0;
    if primary_key && foreign_key {
        panic!("The primary key cannot be a foreign key");
    }
    let (type_name, tag, variant) = decode_type(&field.ty, foreign_key);
    let name = if primary_key {
        format!("{table}_id")
    } else if foreign_key {
        format!("{}_id", field_name.to_case(Case::Snake))
    } else {
        field_name.to_case(Case::Snake)
    };
    ColumnMetadata {
        ident,
        name,
        field: field_name,
        type_name,
        tag,
        variant,
        column_type,
        with,
        primary_key,
        foreign_type: foreign_key.then(|| field.ty.clone()),
    }
}

fn decode_type(ty: &Type, foreign_key: bool) -> (String, TokenStream, Option<TokenStream>) {
    let Type::Path(path) = ty else {
        panic!("Unsupported field type `{}`", ty.to_token_stream());
    };
    let name = path
        .path
        .segments
        .last()
        .expect("Field type is expected to have a name")
        .ident
        .to_string();
    let scalar = match name.as_str() {
        "bool" => Some((quote!(::silo::TypeTag::Boolean), quote!(::silo::Value::Boolean))),
        "i8" => Some((quote!(::silo::TypeTag::Int8), quote!(::silo::Value::Int8))),
        "i16" => Some((quote!(::silo::TypeTag::Int16), quote!(::silo::Value::Int16))),
        "i32" => Some((quote!(::silo::TypeTag::Int32), quote!(::silo::Value::Int32))),
        "i64" => Some((quote!(::silo::TypeTag::Int64), quote!(::silo::Value::Int64))),
        "u8" => Some((quote!(::silo::TypeTag::UInt8), quote!(::silo::Value::UInt8))),
        "u16" => Some((quote!(::silo::TypeTag::UInt16), quote!(::silo::Value::UInt16))),
        "u32" => Some((quote!(::silo::TypeTag::UInt32), quote!(::silo::Value::UInt32))),
        "u64" => Some((quote!(::silo::TypeTag::UInt64), quote!(::silo::Value::UInt64))),
        "f32" => Some((quote!(::silo::TypeTag::Float32), quote!(::silo::Value::Float32))),
        "f64" => Some((quote!(::silo::TypeTag::Float64), quote!(::silo::Value::Float64))),
        "String" => Some((quote!(::silo::TypeTag::Varchar), quote!(::silo::Value::Varchar))),
        _ => None,
    };
    match (scalar, foreign_key) {
        (Some(..), true) => panic!("A foreign key field must have an entity type, not `{name}`"),
        (Some((tag, variant)), false) => (name, tag, Some(variant)),
        (None, true) => (name, quote!(::silo::TypeTag::Entity), None),
        (None, false) => panic!(
            "Unknown type `{name}`, use a supported scalar or mark the field `#[silo(foreign_key)]`"
        ),
    }
}
