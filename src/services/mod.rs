// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod storage;
pub mod upload_service;

pub use storage::*;
pub use upload_service::*;
