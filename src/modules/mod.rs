//! Clients for the external systems the service talks to.

pub mod identity;
pub mod storage;
