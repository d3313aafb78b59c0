pub mod file_ops;
pub mod fixture_ops;
