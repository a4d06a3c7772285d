pub mod commands;
pub mod git;
pub mod logging;
pub mod models;
pub mod parser;
pub mod report;
pub mod runner;
