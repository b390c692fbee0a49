pub mod derived_metrics;
pub mod filter_state;
pub mod read_model;
pub mod report_service;
pub mod session_guard;
