pub mod aggregator;
pub mod processor;
