// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod pagination;
pub mod photo;
pub mod post;
pub mod response;
pub mod user;

pub use pagination::*;
pub use photo::*;
pub use post::*;
pub use response::*;
pub use user::*;
