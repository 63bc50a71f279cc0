pub mod config;
pub mod logging;

pub mod canonical;
pub mod mapping;
pub mod probe;
pub mod report;
pub mod resolve;
pub mod retry;
pub mod rules;
