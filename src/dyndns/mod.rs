//! dyndns2 update protocol: request normalization, reconciliation and the
//! status vocabulary answered to clients.

pub mod reconcile;
pub mod request;
pub mod service;
pub mod status;
pub mod store;

pub use request::{UpdateParams, UpdateRequest};
pub use service::process_update;
pub use status::{StatusResponse, UpdateStatus};
pub use store::{DnsStore, FamilyTarget};
