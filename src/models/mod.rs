pub mod loaders;
pub mod quiz;

pub use loaders::{load_schema_template, SchemaTemplates};
pub use quiz::{
    Evaluation, OptionLabel, Options, Pricing, Question, Quiz, TableRow, TokenInfo, TokenUsage,
};
