//! Schema type to MySQL type mapping, plus literal quoting.

use crate::schema::DataType;

/// Map a fixed-shape data type to its MySQL rendering.
///
/// `ENUM` has no fixed rendering and yields `None`; see [`enum_type`].
pub fn map_type(data_type: DataType) -> Option<&'static str> {
    match data_type {
        DataType::Integer => Some("INTEGER"),
        DataType::String => Some("VARCHAR(255)"),
        DataType::Boolean => Some("BOOL"),
        DataType::Float => Some("FLOAT"),
        DataType::Timestamp => Some("DATETIME"),
        DataType::Json => Some("JSON"),
        DataType::Enum => None,
    }
}

/// Render `ENUM('a','b',...)` in declaration order.
pub fn enum_type(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote_literal(v)).collect();
    format!("ENUM({})", quoted.join(","))
}

/// Quote a string as a MySQL single-quoted literal.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
