use chrono::Utc;

/// Source of the Unix timestamp used to sign a request
pub trait Clock: Send + Sync {
    /// Current time in whole Unix seconds
    fn unix_seconds(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock pinned to one instant, for reproducible signatures
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn unix_seconds(&self) -> i64 {
        self.0
    }
}
