pub mod ai;
pub mod ai_types;
pub mod csv_writer;
pub mod encoding;
pub mod extractor;
pub mod pipeline;
pub mod registry;
pub mod translator;
