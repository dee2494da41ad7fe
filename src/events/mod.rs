//! Dealing event fan-out.
//!
//! ## Key Types
//!
//! - `DealEvent`: the six dealing notifications
//! - `CallbackRegistry`: ordered observer list with removal tokens
//! - `DealingObserver`: the observer capability, plus `LoggingObserver`
//!   and `EventRecorder`

pub mod event;
pub mod observer;
pub mod registry;

pub use event::{DealEvent, DealEventKind};
pub use observer::{DealingObserver, EventRecorder, LoggingObserver};
pub use registry::{CallbackRegistry, ObserverId};
