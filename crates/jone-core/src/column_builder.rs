//! Column definitions and the fluent column builder.
//!
//! Every column call on a [`Table`](crate::Table) appends one [`Column`] and
//! hands back a [`ColumnBuilder`] borrowing it, so modifiers are applied in
//! place:
//!
//! ```rust
//! use jone_core::Table;
//!
//! let mut table = Table::new("users");
//! table.string("email").length(120).not_nullable().unique();
//!
//! let email = &table.columns[0];
//! assert_eq!(email.length, Some(120));
//! assert!(email.not_null && email.unique);
//! ```

/// Column data types understood by the dialect compiler.
///
/// Each variant has a stable, case-sensitive type name (see
/// [`DataType::name`]) that dialects key their type maps on. Names no
/// dialect recognises travel as [`DataType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Variable-length string (`varchar`).
    Varchar,
    /// 32-bit integer (`int`).
    Int,
    /// 64-bit integer (`bigint`).
    BigInt,
    /// 16-bit integer (`smallint`).
    SmallInt,
    /// Single precision float (`float`).
    Float,
    /// Double precision float (`double`).
    Double,
    /// Fixed-point number (`decimal`).
    Decimal,
    /// Boolean (`boolean`).
    Boolean,
    /// Unbounded text (`text`).
    Text,
    /// Calendar date (`date`).
    Date,
    /// Time of day (`time`).
    Time,
    /// Date and time (`timestamp`).
    Timestamp,
    /// UUID (`uuid`).
    Uuid,
    /// JSON document (`json`).
    Json,
    /// Binary JSON document (`jsonb`).
    Jsonb,
    /// Raw bytes (`binary`).
    Binary,
    /// Auto-incrementing 32-bit integer (`serial`).
    Serial,
    /// Auto-incrementing 64-bit integer (`bigserial`).
    BigSerial,
    /// Any other database-native type, passed through by name.
    Custom(String),
}

impl DataType {
    /// Returns the generic type name used as the dialect type-map key.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Varchar => "varchar",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::SmallInt => "smallint",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Binary => "binary",
            Self::Serial => "serial",
            Self::BigSerial => "bigserial",
            Self::Custom(name) => name,
        }
    }

    /// Parses a generic type name. Matching is case-sensitive; anything
    /// unrecognised becomes [`DataType::Custom`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "varchar" | "string" => Self::Varchar,
            "int" => Self::Int,
            "bigint" => Self::BigInt,
            "smallint" => Self::SmallInt,
            "float" => Self::Float,
            "double" => Self::Double,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "text" => Self::Text,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" => Self::Timestamp,
            "uuid" => Self::Uuid,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "binary" => Self::Binary,
            "serial" => Self::Serial,
            "bigserial" => Self::BigSerial,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<&str> for DataType {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// String literal, rendered single-quoted.
    String(String),
    /// Boolean literal.
    Boolean(bool),
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// Raw SQL expression (e.g., `CURRENT_TIMESTAMP`), rendered verbatim.
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL literal for this default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Boolean(true) => String::from("TRUE"),
            Self::Boolean(false) => String::from("FALSE"),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) if f.is_nan() => String::from("'NaN'"),
            Self::Float(f) if f.is_infinite() && f.is_sign_positive() => String::from("'Infinity'"),
            Self::Float(f) if f.is_infinite() => String::from("'-Infinity'"),
            Self::Float(f) => f.to_string(),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for DefaultValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Inline `REFERENCES` target of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
    /// The referenced table name.
    pub table: String,
    /// The referenced column name.
    pub column: String,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Whether this is a primary key.
    pub primary_key: bool,
    /// Whether the column is NOT NULL.
    pub not_null: bool,
    /// Whether this column is unique.
    pub unique: bool,
    /// Whether the column is unsigned (ignored by dialects without unsigned types).
    pub unsigned: bool,
    /// Default value; `None` means no DEFAULT clause.
    pub default: Option<DefaultValue>,
    /// Explicit length (string types).
    pub length: Option<u32>,
    /// Explicit precision (decimal types).
    pub precision: Option<u32>,
    /// Explicit scale (decimal types).
    pub scale: Option<u32>,
    /// Column comment.
    pub comment: Option<String>,
    /// Inline reference to another table's column.
    pub references: Option<ColumnReference>,
}

impl Column {
    /// Creates a nullable column with no modifiers.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            not_null: false,
            unique: false,
            unsigned: false,
            default: None,
            length: None,
            precision: None,
            scale: None,
            comment: None,
            references: None,
        }
    }

    /// Returns whether a DEFAULT clause will be emitted.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Fluent handle to a column that was just appended to a table.
///
/// Modifiers mutate the column in place and return the same handle.
#[derive(Debug)]
pub struct ColumnBuilder<'a> {
    column: &'a mut Column,
}

impl<'a> ColumnBuilder<'a> {
    pub(crate) fn new(column: &'a mut Column) -> Self {
        Self { column }
    }

    /// Returns the column as built so far.
    #[must_use]
    pub fn column(&self) -> &Column {
        self.column
    }

    /// Sets the length (e.g. `VARCHAR(n)`).
    pub fn length(self, length: u32) -> Self {
        self.column.length = Some(length);
        self
    }

    /// Sets the precision of a decimal column.
    pub fn precision(self, precision: u32) -> Self {
        self.column.precision = Some(precision);
        self
    }

    /// Sets the scale of a decimal column.
    pub fn scale(self, scale: u32) -> Self {
        self.column.scale = Some(scale);
        self
    }

    /// Marks the column as NOT NULL.
    pub fn not_nullable(self) -> Self {
        self.column.not_null = true;
        self
    }

    /// Marks the column as nullable (default).
    pub fn nullable(self) -> Self {
        self.column.not_null = false;
        self
    }

    /// Marks the column as UNIQUE.
    pub fn unique(self) -> Self {
        self.column.unique = true;
        self
    }

    /// Marks the column as PRIMARY KEY.
    pub fn primary(self) -> Self {
        self.column.primary_key = true;
        self
    }

    /// Marks the column as unsigned.
    pub fn unsigned(self) -> Self {
        self.column.unsigned = true;
        self
    }

    /// Sets the default value. The last call wins.
    pub fn default(self, value: impl Into<DefaultValue>) -> Self {
        self.column.default = Some(value.into());
        self
    }

    /// Sets a raw SQL expression as default (e.g. `CURRENT_TIMESTAMP`).
    pub fn default_raw(self, expr: impl Into<String>) -> Self {
        self.column.default = Some(DefaultValue::Expression(expr.into()));
        self
    }

    /// Sets the column comment.
    pub fn comment(self, comment: impl Into<String>) -> Self {
        self.column.comment = Some(comment.into());
        self
    }

    /// Adds an inline `REFERENCES table(column)` clause.
    pub fn references(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.column.references = Some(ColumnReference {
            table: table.into(),
            column: column.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_column() {
        let col = Column::new("id", DataType::Int);
        assert_eq!(col.name, "id");
        assert_eq!(col.data_type, DataType::Int);
        assert!(!col.not_null);
        assert!(!col.primary_key);
        assert!(!col.has_default());
    }

    #[test]
    fn test_modifiers_mutate_in_place() {
        let mut col = Column::new("price", DataType::Decimal);
        ColumnBuilder::new(&mut col)
            .precision(12)
            .scale(4)
            .not_nullable()
            .comment("unit price");

        assert_eq!(col.precision, Some(12));
        assert_eq!(col.scale, Some(4));
        assert!(col.not_null);
        assert_eq!(col.comment.as_deref(), Some("unit price"));
    }

    #[test]
    fn test_last_default_wins() {
        let mut col = Column::new("count", DataType::Int);
        ColumnBuilder::new(&mut col).default(1).default(2);
        assert_eq!(col.default, Some(DefaultValue::Integer(2)));

        ColumnBuilder::new(&mut col).default_raw("nextval('seq')");
        assert_eq!(
            col.default,
            Some(DefaultValue::Expression("nextval('seq')".to_string()))
        );
    }

    #[test]
    fn test_nullable_clears_not_null() {
        let mut col = Column::new("nickname", DataType::Varchar);
        ColumnBuilder::new(&mut col).not_nullable().nullable();
        assert!(!col.not_null);
    }

    #[test]
    fn test_data_type_names_round_trip() {
        for name in [
            "varchar",
            "int",
            "bigint",
            "smallint",
            "float",
            "double",
            "decimal",
            "boolean",
            "text",
            "date",
            "time",
            "timestamp",
            "uuid",
            "json",
            "jsonb",
            "binary",
            "serial",
            "bigserial",
        ] {
            assert_eq!(DataType::from_name(name).name(), name);
        }
        assert_eq!(DataType::from_name("string"), DataType::Varchar);
        assert_eq!(DataType::from_name("INT"), DataType::Custom("INT".to_string()));
        assert_eq!(DataType::from("citext"), DataType::Custom("citext".to_string()));
    }

    #[test]
    fn test_default_value_to_sql() {
        assert_eq!(DefaultValue::Boolean(true).to_sql(), "TRUE");
        assert_eq!(DefaultValue::Boolean(false).to_sql(), "FALSE");
        assert_eq!(DefaultValue::Integer(42).to_sql(), "42");
        assert_eq!(DefaultValue::Float(2.5).to_sql(), "2.5");
        assert_eq!(DefaultValue::from("hello").to_sql(), "'hello'");
        assert_eq!(DefaultValue::from("it's").to_sql(), "'it''s'");
        assert_eq!(
            DefaultValue::Expression("CURRENT_TIMESTAMP".into()).to_sql(),
            "CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_non_finite_float_defaults_are_quoted() {
        assert_eq!(DefaultValue::Float(f64::NAN).to_sql(), "'NaN'");
        assert_eq!(DefaultValue::Float(f64::INFINITY).to_sql(), "'Infinity'");
        assert_eq!(DefaultValue::Float(f64::NEG_INFINITY).to_sql(), "'-Infinity'");
        assert_eq!(DefaultValue::from(-0.5).to_sql(), "-0.5");
    }
}
