pub mod analyzers;
pub mod chart;
pub mod fetch;
pub mod loader;
pub mod models;
pub mod output;
