use chrono::{DateTime, Utc};

/// Source of "now" for timestamps and relative-time derivations.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
