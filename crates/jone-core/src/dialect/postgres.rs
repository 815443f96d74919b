//! PostgreSQL dialect.

use super::Dialect;
use crate::column_builder::{Column, DataType};

const DEFAULT_VARCHAR_LENGTH: u32 = 255;
const DEFAULT_DECIMAL_PRECISION: u32 = 10;
const DEFAULT_DECIMAL_SCALE: u32 = 2;

/// PostgreSQL dialect for migration SQL generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn map_data_type(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Varchar => format!("VARCHAR({DEFAULT_VARCHAR_LENGTH})"),
            DataType::Int => "INTEGER".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::Float => "REAL".to_string(),
            DataType::Double => "DOUBLE PRECISION".to_string(),
            DataType::Decimal => {
                format!("DECIMAL({DEFAULT_DECIMAL_PRECISION},{DEFAULT_DECIMAL_SCALE})")
            }
            DataType::Boolean => "BOOLEAN".to_string(),
            DataType::Text => "TEXT".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::Uuid => "UUID".to_string(),
            DataType::Json => "JSON".to_string(),
            DataType::Jsonb => "JSONB".to_string(),
            DataType::Binary => "BYTEA".to_string(), // PostgreSQL uses BYTEA
            DataType::Serial => "SERIAL".to_string(),
            DataType::BigSerial => "BIGSERIAL".to_string(),
            DataType::Custom(name) => name.to_uppercase(),
        }
    }

    fn column_type(&self, column: &Column) -> String {
        match column.data_type {
            DataType::Varchar => match column.length {
                Some(length) => format!("VARCHAR({length})"),
                None => self.map_data_type(&column.data_type),
            },
            // A missing precision or scale falls back to its default.
            DataType::Decimal if column.precision.is_some() || column.scale.is_some() => format!(
                "DECIMAL({},{})",
                column.precision.unwrap_or(DEFAULT_DECIMAL_PRECISION),
                column.scale.unwrap_or(DEFAULT_DECIMAL_SCALE)
            ),
            _ => self.map_data_type(&column.data_type),
        }
    }
}
