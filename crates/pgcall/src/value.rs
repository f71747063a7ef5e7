//! Untyped scalar values bound positionally to statements.
//!
//! Every parameter travels to the server in the *text* format and the server
//! converts it to the target column's type, so a single representation serves
//! all columns. The conversion seam is this one `ToSql` impl; a typed binding
//! mode can be added here without touching the statement assemblers.
//!
//! The same type is used on the way back: result cells decode into their text
//! rendering (see the `FromSql` impl), which is what the normalized records
//! carry.

use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use tokio_postgres::types::{Format, FromSql, IsNull, ToSql, Type};

type BoxedError = Box<dyn StdError + Sync + Send>;

/// A scalar transmitted to (or read from) the database.
///
/// `NULL` is representable; everything else is text-bindable data. Values are
/// never interpolated into SQL text; they only ever reach the server through
/// a positional placeholder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(Option<String>);

impl Value {
    /// The SQL NULL value.
    pub fn null() -> Self {
        Self(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Text content, unless NULL.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_string(self) -> Option<String> {
        self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(text) => f.write_str(text),
            None => f.write_str("NULL"),
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self(Some(text))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self(Some(text.to_string()))
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Self(Some(text.clone()))
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        // Postgres boolean input accepts these literals
        Self(Some(if flag { "true" } else { "false" }.to_string()))
    }
}

macro_rules! value_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(scalar: $ty) -> Self {
                    Self(Some(scalar.to_string()))
                }
            }
        )*
    };
}

value_from_display!(i16, i32, i64, u16, u32, u64, f32, f64);

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(inner) => inner.into(),
            None => Self(None),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self, _ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxedError> {
        match &self.0 {
            Some(text) => {
                out.extend_from_slice(text.as_bytes());
                Ok(IsNull::No)
            }
            None => Ok(IsNull::Yes),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // the server performs input conversion from the text format
        true
    }

    fn encode_format(&self, _ty: &Type) -> Format {
        Format::Text
    }

    tokio_postgres::types::to_sql_checked!();
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxedError> {
        let text = match ty.name() {
            "bool" => bool::from_sql(ty, raw)?.to_string(),
            "\"char\"" => i8::from_sql(ty, raw)?.to_string(),
            "int2" => i16::from_sql(ty, raw)?.to_string(),
            "int4" => i32::from_sql(ty, raw)?.to_string(),
            "int8" => i64::from_sql(ty, raw)?.to_string(),
            "oid" => u32::from_sql(ty, raw)?.to_string(),
            "float4" => f32::from_sql(ty, raw)?.to_string(),
            "float8" => f64::from_sql(ty, raw)?.to_string(),
            "text" | "varchar" | "bpchar" | "name" | "unknown" => String::from_sql(ty, raw)?,
            "uuid" => uuid::Uuid::from_sql(ty, raw)?.to_string(),
            "json" | "jsonb" => serde_json::Value::from_sql(ty, raw)?.to_string(),
            "date" => chrono::NaiveDate::from_sql(ty, raw)?.to_string(),
            "time" => chrono::NaiveTime::from_sql(ty, raw)?.to_string(),
            "timestamp" => chrono::NaiveDateTime::from_sql(ty, raw)?.to_string(),
            "timestamptz" => chrono::DateTime::<chrono::Utc>::from_sql(ty, raw)?.to_rfc3339(),
            other => return Err(format!("unsupported result column type: {other}").into()),
        };
        Ok(Self(Some(text)))
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxedError> {
        Ok(Self(None))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_and_string() {
        assert_eq!(Value::from("John").as_str(), Some("John"));
        assert_eq!(Value::from(String::from("x")).as_str(), Some("x"));
    }

    #[test]
    fn from_numbers() {
        assert_eq!(Value::from(42i64).as_str(), Some("42"));
        assert_eq!(Value::from(1i32).as_str(), Some("1"));
        assert_eq!(Value::from(2.5f64).as_str(), Some("2.5"));
    }

    #[test]
    fn from_bool() {
        assert_eq!(Value::from(true).as_str(), Some("true"));
        assert_eq!(Value::from(false).as_str(), Some("false"));
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(Some("x")).as_str(), Some("x"));
        assert!(Value::from(None::<i64>).is_null());
    }

    #[test]
    fn null_display() {
        assert_eq!(Value::null().to_string(), "NULL");
        assert_eq!(Value::from("a").to_string(), "a");
    }

    #[test]
    fn text_encoding_is_raw_bytes() {
        let mut buf = BytesMut::new();
        let wrote = Value::from("john@x.com")
            .to_sql(&Type::TEXT, &mut buf)
            .unwrap();
        assert!(matches!(wrote, IsNull::No));
        assert_eq!(&buf[..], b"john@x.com");
    }

    #[test]
    fn null_encodes_as_null() {
        let mut buf = BytesMut::new();
        let wrote = Value::null().to_sql(&Type::TEXT, &mut buf).unwrap();
        assert!(matches!(wrote, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn binds_against_any_column_type() {
        assert!(<Value as ToSql>::accepts(&Type::INT8));
        assert!(<Value as ToSql>::accepts(&Type::TIMESTAMPTZ));
    }

    #[test]
    fn serde_transparent() {
        let v: Value = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(v, Value::from("archived"));
        let n: Value = serde_json::from_str("null").unwrap();
        assert!(n.is_null());
    }
}
