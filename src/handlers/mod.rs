// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod health;
pub mod index;
pub mod multipart;
pub mod photos;
pub mod posts;
pub mod users;

pub use health::config as health_config;
pub use index::config as index_config;
pub use index::not_found;
pub use photos::config as photos_config;
pub use posts::config as posts_config;
pub use users::config as users_config;
