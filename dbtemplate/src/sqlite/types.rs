//! Type conversion utilities for SQLite

use crate::value::{Value, TIMESTAMP_FORMAT};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqliteValue, ValueRef};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let output = match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(v) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*v))),
            Value::Int(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            Value::Float(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Bytes(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
            // SQLite has no timestamp storage class
            Value::Timestamp(v) => {
                ToSqlOutput::Owned(SqliteValue::Text(v.format(TIMESTAMP_FORMAT).to_string()))
            }
        };
        Ok(output)
    }
}

/// Convert a SQLite column value to a dbtemplate Value
pub fn from_sqlite_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(v) => match std::str::from_utf8(v) {
            Ok(s) => Value::Text(s.to_string()),
            Err(_) => Value::Bytes(v.to_vec()),
        },
        ValueRef::Blob(v) => Value::Bytes(v.to_vec()),
    }
}
