use chrono::Utc;

/// Source of timestamps for turns and history, in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}
