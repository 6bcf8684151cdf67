pub mod ddl;
pub mod schema;
pub mod storage;

use wasm_bindgen::prelude::*;

pub use ddl::{DdlError, DdlGenerator, DdlOptions, generate_ddl};
pub use schema::{
    ColumnSchema, DataCategory, DataSensitivity, DataType, EnumSchema, RetentionPolicy,
    SchemaDocument, TableSchema, ValidationError,
};
pub use storage::{StorageError, YamlStorage};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render a YAML schema document to MySQL DDL
#[wasm_bindgen(js_name = "yamlToDdl")]
pub fn render_ddl(source: &str) -> Result<String, String> {
    let document = YamlStorage::parse_document(source).map_err(|e| e.to_string())?;
    generate_ddl(&document.tables).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_ddl() {
        let source = r#"
tables:
  - name: users
    columns:
      - name: id
        data_type: integer
        primary_key: true
        nullable: false
"#;
        let ddl = render_ddl(source).unwrap();
        assert!(ddl.starts_with("CREATE TABLE users ("));
        assert!(ddl.contains("id INTEGER NOT NULL"));
    }

    #[test]
    fn test_render_ddl_reports_errors() {
        let err = render_ddl("tables:\n  - name: t\n    columns:\n      - name: s\n        data_type: enum\n")
            .unwrap_err();
        assert!(err.contains("enum_values"));
    }
}
