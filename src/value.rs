/// A single field value, the unit the format engine and the coercion layer
/// trade in. A field is *defined* when its value differs from the type's
/// zero value, see [`Value::is_zero`].
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Varchar(String),
}

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($out:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

impl Value {
    /// Whether the value equals the zero value of its type. Fields holding
    /// a zero value are treated as unset by [`populate`](crate::populate).
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => !v,
            Value::Int8(v) => *v == 0,
            Value::Int16(v) => *v == 0,
            Value::Int32(v) => *v == 0,
            Value::Int64(v) => *v == 0,
            Value::UInt8(v) => *v == 0,
            Value::UInt16(v) => *v == 0,
            Value::UInt32(v) => *v == 0,
            Value::UInt64(v) => *v == 0,
            Value::Float32(v) => *v == 0.0,
            Value::Float64(v) => *v == 0.0,
            Value::Varchar(v) => v.is_empty(),
        }
    }

    /// Append the value as a SQL literal. Strings are double quoted and
    /// escaped, booleans take their storage representation `'1'` / `'0'`.
    pub fn write_literal(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("NULL"),
            Value::Boolean(v) => out.push_str(if *v { "'1'" } else { "'0'" }),
            Value::Int8(v) => write_integer!(out, *v),
            Value::Int16(v) => write_integer!(out, *v),
            Value::Int32(v) => write_integer!(out, *v),
            Value::Int64(v) => write_integer!(out, *v),
            Value::UInt8(v) => write_integer!(out, *v),
            Value::UInt16(v) => write_integer!(out, *v),
            Value::UInt32(v) => write_integer!(out, *v),
            Value::UInt64(v) => write_integer!(out, *v),
            Value::Float32(v) => write_float!(out, *v),
            Value::Float64(v) => write_float!(out, *v),
            Value::Varchar(v) => {
                out.push('"');
                write_escaped(out, v);
                out.push('"');
            }
        }
    }

    pub fn literal(&self) -> String {
        let mut out = String::with_capacity(16);
        self.write_literal(&mut out);
        out
    }
}

/// Append `value` with `"` and `\` escaped, suitable for a double quoted
/// MySQL string literal.
pub fn write_escaped(out: &mut String, value: &str) {
    let mut position = 0;
    for (i, c) in value.char_indices() {
        if c == '"' || c == '\\' {
            out.push_str(&value[position..i]);
            out.push('\\');
            position = i;
        }
    }
    out.push_str(&value[position..]);
}

macro_rules! impl_from_value {
    ($source:ty, $into:path) => {
        impl From<$source> for Value {
            fn from(value: $source) -> Self {
                $into(value)
            }
        }
    };
}

impl_from_value!(bool, Value::Boolean);
impl_from_value!(i8, Value::Int8);
impl_from_value!(i16, Value::Int16);
impl_from_value!(i32, Value::Int32);
impl_from_value!(i64, Value::Int64);
impl_from_value!(u8, Value::UInt8);
impl_from_value!(u16, Value::UInt16);
impl_from_value!(u32, Value::UInt32);
impl_from_value!(u64, Value::UInt64);
impl_from_value!(f32, Value::Float32);
impl_from_value!(f64, Value::Float64);
impl_from_value!(String, Value::Varchar);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.to_owned())
    }
}
