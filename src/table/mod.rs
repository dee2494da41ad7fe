//! The table service front-ends drive.
//!
//! ## Key Types
//!
//! - `Table`: engine, roster, round bookkeeping
//! - `TableObserver`: bet and status notifications
//! - `TableError`: engine and roster errors, plus the reserved house id

pub mod error;
pub mod observer;
pub mod service;

pub use error::TableError;
pub use observer::TableObserver;
pub use service::Table;
