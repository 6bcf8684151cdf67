//! Governance metadata encoded as the table comment.
//!
//! Format: `[<description> ](Category: c[, Namespace: n][, Owner: o], Sensitivity: s, Retention: r)`.
//! Category, sensitivity and retention are always present; namespace and owner
//! only when set.

use crate::schema::TableSchema;

pub fn table_comment(table: &TableSchema) -> String {
    let mut fields = Vec::with_capacity(5);
    fields.push(format!("Category: {}", table.category.as_str()));
    if let Some(namespace) = &table.namespace {
        fields.push(format!("Namespace: {namespace}"));
    }
    if let Some(owner) = &table.owner {
        fields.push(format!("Owner: {owner}"));
    }
    fields.push(format!("Sensitivity: {}", table.sensitivity.as_str()));
    fields.push(format!("Retention: {}", table.retention.as_str()));

    let metadata = format!("({})", fields.join(", "));
    match table.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => format!("{description} {metadata}"),
        None => metadata,
    }
}
