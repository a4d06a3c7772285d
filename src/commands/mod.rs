pub mod clean;
pub mod deadlines;
pub mod grade;
pub mod parse;
