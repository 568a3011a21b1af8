//! System clock adapter.

use chrono::{DateTime, Utc};

use crate::ports::Clock;

/// Reads wall-clock time for the manifest's `generatedAt` stamp.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
