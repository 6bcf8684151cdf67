//! Lower table schemas into MySQL `CREATE TABLE` statements.

mod comment;
mod enums;
mod types;

pub use comment::table_comment;
pub use enums::{EnumConflict, EnumRegistry, Registration};
pub use types::{enum_type, map_type, quote_literal};

use std::collections::HashSet;

use thiserror::Error;

use crate::schema::{ColumnSchema, DataType, TableSchema, ValidationError};

#[derive(Debug, Error)]
pub enum DdlError {
    #[error("invalid table {table}: {source}")]
    InvalidTable {
        table: String,
        source: ValidationError,
    },
    #[error(
        "enum type {name} redefined by column {column} of table {table}: [{}] conflicts with [{}]",
        .existing.join(", "),
        .found.join(", ")
    )]
    ConflictingEnum {
        name: String,
        table: String,
        column: String,
        existing: Vec<String>,
        found: Vec<String>,
    },
    #[error("table {name} appears more than once")]
    DuplicateTable { name: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DdlOptions {
    /// Emit `CREATE TABLE IF NOT EXISTS`
    pub if_not_exists: bool,
}

#[derive(Debug, Default)]
pub struct DdlGenerator {
    options: DdlOptions,
}

/// Generate DDL for `tables` with default options.
pub fn generate_ddl(tables: &[TableSchema]) -> Result<String, DdlError> {
    DdlGenerator::default().generate(tables)
}

impl DdlGenerator {
    pub fn with_options(options: DdlOptions) -> Self {
        Self { options }
    }

    /// Render one statement per table, in input order, separated by a blank line.
    ///
    /// Any failure aborts the whole batch.
    pub fn generate(&self, tables: &[TableSchema]) -> Result<String, DdlError> {
        let mut registry = EnumRegistry::new();
        let mut names = HashSet::new();
        let mut statements = Vec::with_capacity(tables.len());

        for table in tables {
            if !names.insert(table.name.as_str()) {
                return Err(DdlError::DuplicateTable {
                    name: table.name.clone(),
                });
            }
            statements.push(self.create_table(table, &mut registry)?);
        }

        log::debug!(
            "generated {} statement(s), {} enum type(s)",
            statements.len(),
            registry.len()
        );
        Ok(statements.join("\n\n"))
    }

    fn create_table(
        &self,
        table: &TableSchema,
        registry: &mut EnumRegistry,
    ) -> Result<String, DdlError> {
        table.validate().map_err(|source| DdlError::InvalidTable {
            table: table.name.clone(),
            source,
        })?;

        let mut items = Vec::with_capacity(table.columns.len() + 1);
        for column in &table.columns {
            items.push(render_column(table, column, registry)?);
        }
        items.extend(constraints(table));

        let mut sql = String::new();
        sql.push_str("CREATE TABLE ");
        if self.options.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&table.name);
        sql.push_str(" (\n");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                sql.push_str(",\n");
            }
            sql.push_str("    ");
            sql.push_str(item);
        }
        sql.push_str("\n) COMMENT=");
        sql.push_str(&quote_literal(&table_comment(table)));
        sql.push(';');

        log::debug!(
            "rendered table {} ({} columns, {} constraints)",
            table.name,
            table.columns.len(),
            items.len() - table.columns.len()
        );
        Ok(sql)
    }
}

/// Column clause: name, type, `NOT NULL`, `DEFAULT`. Uniqueness is emitted as a
/// table constraint.
fn render_column(
    table: &TableSchema,
    column: &ColumnSchema,
    registry: &mut EnumRegistry,
) -> Result<String, DdlError> {
    let typ = match map_type(column.data_type) {
        Some(typ) => typ.to_string(),
        None => {
            let name = enum_type_name(table, column);
            match registry.register(&name, &column.enum_values) {
                Ok(Registration::New) => log::trace!("registered enum type {}", name),
                Ok(Registration::Shared) => log::trace!("reusing enum type {}", name),
                Err(EnumConflict { existing }) => {
                    return Err(DdlError::ConflictingEnum {
                        name,
                        table: table.name.clone(),
                        column: column.name.clone(),
                        existing,
                        found: column.enum_values.clone(),
                    });
                }
            }
            enum_type(&column.enum_values)
        }
    };

    let mut clause = format!("{} {}", column.name, typ);
    if !column.nullable {
        clause.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        clause.push_str(" DEFAULT ");
        clause.push_str(&quote_literal(default));
    }
    Ok(clause)
}

/// Canonical enum type name: explicit `enum_name`, else `{table}_{column}_enum`.
pub fn enum_type_name(table: &TableSchema, column: &ColumnSchema) -> String {
    debug_assert_eq!(column.data_type, DataType::Enum);
    match &column.enum_name {
        Some(name) => name.clone(),
        None => format!("{}_{}_enum", table.name, column.name),
    }
}

/// Primary key, single-column uniques, then composite uniques.
fn constraints(table: &TableSchema) -> Vec<String> {
    let mut out = Vec::new();

    let pk: Vec<&str> = table
        .columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name.as_str())
        .collect();
    if !pk.is_empty() {
        out.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    }

    let in_composite: HashSet<&str> = table
        .composite_unique_constraints
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();
    for column in &table.columns {
        if column.unique && !in_composite.contains(column.name.as_str()) {
            out.push(format!("UNIQUE ({})", column.name));
        }
    }

    for group in &table.composite_unique_constraints {
        out.push(format!("UNIQUE ({})", group.join(", ")));
    }

    out
}
