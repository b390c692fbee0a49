pub mod filter;
pub mod reports;
pub mod derived;
pub mod snapshot;
