//! Time source abstraction so cooldown logic is testable with a fixed clock.

/// Source of "now" in unix-epoch seconds.
pub trait Clock {
    fn now_epoch(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

/// Returns unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`),
/// the timestamp shape used by the broker audit log.
pub fn now_epoch_z() -> String {
    format!("{}Z", SystemClock.now_epoch())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_sane() {
        // Well past 2020-01-01.
        assert!(SystemClock.now_epoch() > 1_577_836_800);
    }

    #[test]
    fn test_now_epoch_z_format() {
        let result = now_epoch_z();
        assert!(result.ends_with('Z'));
        let numeric_part = result.trim_end_matches('Z');
        assert!(numeric_part.parse::<u64>().is_ok());
    }
}
