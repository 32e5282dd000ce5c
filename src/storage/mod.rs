pub mod csv;
pub mod types;

pub use self::csv::{write_csv, CsvStorage};
pub use types::OutputTarget;
