mod base;
pub mod html;

pub use base::{ParseOutcome, Parser};
pub use html::ResultListParser;
