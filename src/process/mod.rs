// src/process/mod.rs
pub mod convert;
pub mod date_parser;
pub mod reader;
pub mod trimming;
pub mod utils;
pub mod writer;

pub use reader::read_table;
pub use writer::write_table;
