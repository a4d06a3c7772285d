pub mod ansi;
pub mod test_output;

pub use test_output::parse_test_output;
