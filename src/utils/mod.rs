pub mod replace_file;
pub mod resilient_reader;
