//! Database schema and queries

pub mod init;
pub mod items;
pub mod locations;
pub mod templates;

pub use init::*;
pub use items::*;
pub use locations::*;
pub use templates::*;
