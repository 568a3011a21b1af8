//! Service context bundling all port trait objects.

use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. The live constructor
/// wires up real adapters; tests build the struct directly with in-memory
/// replacements.
pub struct ServiceContext {
    /// Clock for manifest timestamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem for plan reads, tree walks and guard-state writes.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context backed by the system clock and real disk.
    #[must_use]
    pub fn live() -> Self {
        use crate::adapters::live::clock::LiveClock;
        use crate::adapters::live::filesystem::LiveFileSystem;

        Self { clock: Box::new(LiveClock), fs: Box::new(LiveFileSystem) }
    }
}
