pub mod analyzers;
pub mod calendar;
pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
