pub mod reports;
pub mod session;
