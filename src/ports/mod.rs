//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the guard core and the outside
//! world (time, filesystem). Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;

pub use clock::Clock;
pub use filesystem::FileSystem;

/// Error type returned by port implementations.
///
/// Call sites attach path context when converting into
/// [`GuardError`](crate::error::GuardError).
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
