pub mod report_client;
pub use report_client::{HttpReportClient, ReportQuery, ReportSource};
pub mod credential_store;
pub use credential_store::{CredentialStore, MemoryCredentialStore};
pub mod navigator;
pub use navigator::{BroadcastNavigator, NavigationEvent, Navigator};

#[cfg(test)]
pub mod fakes;
