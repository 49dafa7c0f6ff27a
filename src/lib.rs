pub mod aggregate;
pub mod config;
pub mod fetch;
pub mod parse;
pub mod present;
pub mod render;
pub mod report;
