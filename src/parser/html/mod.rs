mod html_parser;

pub use html_parser::ResultListParser;
