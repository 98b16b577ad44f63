//! Domain subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP payload
//!     → model.rs (TodoItem, TodoQuery, StatusFilter)
//!     → repository.rs (storage contract)
//!     → error.rs (NotFound vs. Storage outcomes)
//! ```
//!
//! # Design Decisions
//! - The repository trait is the unit of truth; backends normalise their
//!   own "no row" signals into `RepositoryError::NotFound`
//! - Models carry no behaviour beyond filter parsing

pub mod error;
pub mod model;
pub mod repository;

pub use error::RepositoryError;
pub use model::{StatusFilter, TodoItem, TodoPayload, TodoQuery};
pub use repository::{SharedRepository, TodoRepository};
