pub mod pricing;
pub mod record;
pub mod vehicle;
