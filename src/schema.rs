//! Declarative table model: tables, columns, enumerations and governance metadata.
//!
//! Every entity validates itself. Deserialization goes through `Raw*` mirrors so a
//! document can never yield an entity that `validate` would reject.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("table name must not be empty")]
    EmptyTableName,
    #[error("column name must not be empty")]
    EmptyColumnName,
    #[error("enum name must not be empty")]
    EmptyEnumName,
    #[error("table {table} has no columns")]
    NoColumns { table: String },
    #[error("table {table} declares column {column} more than once")]
    DuplicateColumn { table: String, column: String },
    #[error("column {column} is of type ENUM but has no enum_values defined")]
    MissingEnumValues { column: String },
    #[error("column {column} is of type {data_type} but declares enum_values")]
    UnexpectedEnumValues { column: String, data_type: DataType },
    #[error("{owner} lists enum value '{value}' more than once")]
    DuplicateEnumValue { owner: String, value: String },
    #[error("enum {name} has no values")]
    EmptyEnumValues { name: String },
    #[error("composite unique constraint on table {table} needs at least 2 distinct columns, got [{}]", .columns.join(", "))]
    CompositeTooSmall { table: String, columns: Vec<String> },
    #[error("composite unique constraint on table {table} references unknown column {column}")]
    UnknownConstraintColumn { table: String, column: String },
}

/// Column types the generator knows how to lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    String,
    Boolean,
    Float,
    Timestamp,
    Json,
    Enum,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Timestamp => "timestamp",
            Self::Json => "json",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    /// Curated reference data changed only through review
    #[default]
    Controlled,
    /// Data written by the running application
    Dynamic,
}

impl DataCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Controlled => "controlled",
            Self::Dynamic => "dynamic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSensitivity {
    Public,
    #[default]
    Internal,
    Confidential,
    /// Personally identifiable information
    Pii,
}

impl DataSensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Confidential => "confidential",
            Self::Pii => "pii",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    #[default]
    Indefinite,
    FiscalYear,
}

impl RetentionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indefinite => "indefinite",
            Self::FiscalYear => "fiscal_year",
        }
    }
}

/// A named enumeration cataloged on its own, independent of any column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEnum")]
pub struct EnumSchema {
    pub name: String,
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EnumSchema {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyEnumName);
        }
        if self.values.is_empty() {
            return Err(ValidationError::EmptyEnumValues {
                name: self.name.clone(),
            });
        }
        check_distinct(&format!("enum {}", self.name), &self.values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColumn")]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: DataType,
    pub primary_key: bool,
    pub nullable: bool,
    pub unique: bool,
    /// Server-side default, kept as the literal text to emit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            nullable: true,
            unique: false,
            default: None,
            enum_values: Vec::new(),
            enum_name: None,
        }
    }

    /// Shorthand for an `ENUM` column over `values`.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, DataType::Enum).with_enum_values(values)
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_enum_name(mut self, enum_name: impl Into<String>) -> Self {
        self.enum_name = Some(enum_name.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyColumnName);
        }
        match (self.data_type, self.enum_values.is_empty()) {
            (DataType::Enum, true) => Err(ValidationError::MissingEnumValues {
                column: self.name.clone(),
            }),
            (DataType::Enum, false) => {
                check_distinct(&format!("column {}", self.name), &self.enum_values)
            }
            (data_type, false) => Err(ValidationError::UnexpectedEnumValues {
                column: self.name.clone(),
                data_type,
            }),
            (_, true) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: DataCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub sensitivity: DataSensitivity,
    pub retention: RetentionPolicy,
    /// Each group becomes one multi-column `UNIQUE` constraint
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub composite_unique_constraints: Vec<Vec<String>>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            name: name.into(),
            columns,
            description: None,
            category: DataCategory::default(),
            namespace: None,
            owner: None,
            sensitivity: DataSensitivity::default(),
            retention: RetentionPolicy::default(),
            composite_unique_constraints: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: DataCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: DataSensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_composite_unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.composite_unique_constraints
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyTableName);
        }
        if self.columns.is_empty() {
            return Err(ValidationError::NoColumns {
                table: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            column.validate()?;
            if !seen.insert(column.name.as_str()) {
                return Err(ValidationError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        for group in &self.composite_unique_constraints {
            let distinct: HashSet<&str> = group.iter().map(String::as_str).collect();
            if distinct.len() < 2 {
                return Err(ValidationError::CompositeTooSmall {
                    table: self.name.clone(),
                    columns: group.clone(),
                });
            }
            if let Some(missing) = group.iter().find(|c| !seen.contains(c.as_str())) {
                return Err(ValidationError::UnknownConstraintColumn {
                    table: self.name.clone(),
                    column: missing.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Root of a stored schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub enums: Vec<EnumSchema>,
    #[serde(default)]
    pub tables: Vec<TableSchema>,
}

impl SchemaDocument {
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }
}

fn check_distinct(owner: &str, values: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    match values.iter().find(|v| !seen.insert(v.as_str())) {
        Some(value) => Err(ValidationError::DuplicateEnumValue {
            owner: owner.to_string(),
            value: value.clone(),
        }),
        None => Ok(()),
    }
}

// Deserialization mirrors

#[derive(Deserialize)]
struct RawEnum {
    name: String,
    values: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawEnum> for EnumSchema {
    type Error = ValidationError;

    fn try_from(raw: RawEnum) -> Result<Self, Self::Error> {
        let schema = EnumSchema {
            name: raw.name,
            values: raw.values,
            description: raw.description,
        };
        schema.validate()?;
        Ok(schema)
    }
}

fn default_nullable() -> bool {
    true
}

#[derive(Deserialize)]
struct RawColumn {
    name: String,
    data_type: DataType,
    #[serde(default)]
    primary_key: bool,
    #[serde(default = "default_nullable")]
    nullable: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    enum_values: Option<Vec<String>>,
    #[serde(default)]
    enum_name: Option<String>,
}

impl TryFrom<RawColumn> for ColumnSchema {
    type Error = ValidationError;

    fn try_from(raw: RawColumn) -> Result<Self, Self::Error> {
        let column = ColumnSchema {
            name: raw.name,
            data_type: raw.data_type,
            primary_key: raw.primary_key,
            nullable: raw.nullable,
            unique: raw.unique,
            default: raw.default,
            enum_values: raw.enum_values.unwrap_or_default(),
            enum_name: raw.enum_name,
        };
        column.validate()?;
        Ok(column)
    }
}

#[derive(Deserialize)]
struct RawTable {
    name: String,
    columns: Vec<ColumnSchema>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: DataCategory,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    sensitivity: DataSensitivity,
    #[serde(default)]
    retention: RetentionPolicy,
    #[serde(default)]
    composite_unique_constraints: Vec<Vec<String>>,
}

impl TryFrom<RawTable> for TableSchema {
    type Error = ValidationError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let table = TableSchema {
            name: raw.name,
            columns: raw.columns,
            description: raw.description,
            category: raw.category,
            namespace: raw.namespace,
            owner: raw.owner,
            sensitivity: raw.sensitivity,
            retention: raw.retention,
            composite_unique_constraints: raw.composite_unique_constraints,
        };
        table.validate()?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableSchema {
        TableSchema::new(
            "users",
            vec![
                ColumnSchema::new("id", DataType::Integer).primary_key().not_null(),
                ColumnSchema::new("email", DataType::String).unique(),
            ],
        )
    }

    #[test]
    fn test_column_defaults() {
        let col = ColumnSchema::new("id", DataType::Integer);
        assert!(!col.primary_key);
        assert!(col.nullable);
        assert!(!col.unique);
        assert_eq!(col.default, None);
        assert!(col.enum_values.is_empty());
    }

    #[test]
    fn test_table_defaults() {
        let table = users();
        assert_eq!(table.category, DataCategory::Controlled);
        assert_eq!(table.sensitivity, DataSensitivity::Internal);
        assert_eq!(table.retention, RetentionPolicy::Indefinite);
        assert_eq!(table.namespace, None);
        assert_eq!(table.owner, None);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_empty_names_rejected() {
        let table = TableSchema::new("", users().columns);
        assert_eq!(table.validate(), Err(ValidationError::EmptyTableName));

        let col = ColumnSchema::new("", DataType::String);
        assert_eq!(col.validate(), Err(ValidationError::EmptyColumnName));
    }

    #[test]
    fn test_no_columns_rejected() {
        let table = TableSchema::new("empty", vec![]);
        assert!(matches!(
            table.validate(),
            Err(ValidationError::NoColumns { .. })
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let table = TableSchema::new(
            "t",
            vec![
                ColumnSchema::new("a", DataType::Integer),
                ColumnSchema::new("a", DataType::String),
            ],
        );
        assert_eq!(
            table.validate(),
            Err(ValidationError::DuplicateColumn {
                table: "t".into(),
                column: "a".into()
            })
        );
    }

    #[test]
    fn test_enum_without_values() {
        let err = ColumnSchema::new("status", DataType::Enum)
            .validate()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("status"));
        assert!(msg.contains("no enum_values defined"));
    }

    #[test]
    fn test_enum_values_on_non_enum_column() {
        let col = ColumnSchema::new("kind", DataType::String).with_enum_values(["a", "b"]);
        assert!(matches!(
            col.validate(),
            Err(ValidationError::UnexpectedEnumValues {
                data_type: DataType::String,
                ..
            })
        ));
    }

    #[test]
    fn test_enum_values_must_be_distinct() {
        let col = ColumnSchema::enumeration("status", ["todo", "done", "todo"]);
        assert_eq!(
            col.validate(),
            Err(ValidationError::DuplicateEnumValue {
                owner: "column status".into(),
                value: "todo".into()
            })
        );

        let schema = EnumSchema::new("Status", ["A", "A"]);
        assert!(schema.validate().is_err());
        assert!(EnumSchema::new("Status", Vec::<String>::new()).validate().is_err());
    }

    #[test]
    fn test_composite_constraint_validation() {
        let ok = users().with_composite_unique(["id", "email"]);
        assert!(ok.validate().is_ok());

        let single = users().with_composite_unique(["email"]);
        assert!(matches!(
            single.validate(),
            Err(ValidationError::CompositeTooSmall { .. })
        ));

        let repeated = users().with_composite_unique(["email", "email"]);
        assert!(matches!(
            repeated.validate(),
            Err(ValidationError::CompositeTooSmall { .. })
        ));

        let unknown = users().with_composite_unique(["email", "phone"]);
        assert_eq!(
            unknown.validate(),
            Err(ValidationError::UnknownConstraintColumn {
                table: "users".into(),
                column: "phone".into()
            })
        );
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let yaml = r#"
name: tasks
columns:
  - name: id
    data_type: integer
    primary_key: true
  - name: status
    data_type: enum
    enum_values: [todo, done]
    default: todo
  - name: is_active
    data_type: boolean
    default: true
"#;
        let table: TableSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.category, DataCategory::Controlled);
        assert!(table.columns[0].nullable);
        assert_eq!(table.columns[1].enum_values, vec!["todo", "done"]);
        assert_eq!(table.columns[2].default.as_deref(), Some("true"));
    }

    #[test]
    fn test_numeric_defaults_keep_source_text() {
        let yaml = r#"
name: prices
columns:
  - name: amount
    data_type: float
    default: 1.50
  - name: ratio
    data_type: float
    default: 1.0
  - name: big
    data_type: integer
    default: 12345678901234567890
"#;
        let table: TableSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.columns[0].default.as_deref(), Some("1.50"));
        assert_eq!(table.columns[1].default.as_deref(), Some("1.0"));
        assert_eq!(
            table.columns[2].default.as_deref(),
            Some("12345678901234567890")
        );

        let ddl = crate::ddl::generate_ddl(&[table]).unwrap();
        assert!(ddl.contains("amount FLOAT DEFAULT '1.50'"));
        assert!(ddl.contains("ratio FLOAT DEFAULT '1.0'"));
    }

    #[test]
    fn test_deserialize_rejects_invalid_table() {
        let yaml = r#"
name: bad
columns:
  - name: status
    data_type: enum
    enum_values: null
"#;
        let err = serde_yaml::from_str::<TableSchema>(yaml).unwrap_err();
        assert!(err.to_string().contains("enum_values"));
    }

    #[test]
    fn test_wire_forms() {
        assert_eq!(DataType::Timestamp.to_string(), "TIMESTAMP");
        assert_eq!(RetentionPolicy::FiscalYear.as_str(), "fiscal_year");
        assert_eq!(
            serde_yaml::to_string(&DataSensitivity::Pii).unwrap().trim(),
            "pii"
        );
    }
}
