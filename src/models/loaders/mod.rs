pub mod schema_loader;

pub use schema_loader::{load_schema_template, SchemaTemplates};
