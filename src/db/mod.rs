// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod photo_repository;
pub mod post_repository;
pub mod user_repository;

pub use photo_repository::*;
pub use post_repository::*;
pub use user_repository::*;
