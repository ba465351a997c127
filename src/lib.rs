pub mod cli;
pub mod commands;
pub mod coverage;
pub mod discovery;
pub mod scores;
pub mod utils;
