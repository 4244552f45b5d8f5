//! Tick-driven session harness for the combat core.
//!
//! The runtime owns the timer queue and the world-side collaborator
//! implementations, translates player commands and enemy ticks into core
//! operations, and reports what happened as session events. Everything runs
//! on a single thread; delayed callbacks resolve through the timer queue on
//! the main tick.

pub mod error;
pub mod scheduler;
pub mod session;
pub mod world;

pub use error::RuntimeError;
pub use scheduler::TimerQueue;
pub use session::{PlayerCommand, Session, SessionEvent};
pub use world::{PresentationCall, PresentationLog, SpatialIndex, SteeringNavigator};
