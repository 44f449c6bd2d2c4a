//! Silo: a small MySQL data layer.
//!
//! Entity structs derive a compile time schema description; the format
//! engine renders their fields into SQL fragments; the synchronizer
//! reconciles the live database against the declared structure; the CRUD
//! layer offers claim, delete and populate over a single table.
//!
//! ```ignore
//! let mut registry = Registry::new();
//! registry.register(&Player::default());
//! let db = Connection::connect(&env::var("DSN")?).await?;
//! sync_tables(&db, &registry, &SyncOptions::default())
//!     .await
//!     .into_result()?;
//! let player = claim_entity(&db, player).await?;
//! ```

mod column;
mod connection;
mod crud;
mod entity;
mod error;
pub mod format;
mod registry;
mod source;
mod sync;
mod value;

pub use column::*;
pub use connection::*;
pub use crud::*;
pub use entity::*;
pub use error::*;
pub use registry::*;
pub use silo_macros::Entity;
pub use source::*;
pub use sync::*;
pub use value::*;
