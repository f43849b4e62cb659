use chrono::{DateTime, Local};

/// Wall-clock start of the sorting session.
///
/// Elapsed time is always derived from `now - started_at`; it is never
/// paused, reset or cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionClock {
    started_at: DateTime<Local>,
}

/// Snapshot of the status bar numbers at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub elapsed_secs: i64,
    pub images_per_minute: f64,
}

impl SessionClock {
    pub fn start() -> Self {
        Self::starting_at(Local::now())
    }

    pub fn starting_at(started_at: DateTime<Local>) -> Self {
        Self { started_at }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Whole seconds since the start (0 if the clock went backwards)
    pub fn elapsed_seconds(&self, now: DateTime<Local>) -> i64 {
        (now - self.started_at).num_seconds().max(0)
    }

    /// Cumulative rate since the session started
    pub fn throughput(&self, processed: usize, now: DateTime<Local>) -> Throughput {
        let elapsed_secs = self.elapsed_seconds(now);
        Throughput {
            elapsed_secs,
            images_per_minute: images_per_minute(processed, elapsed_secs),
        }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

/// `processed / (elapsed / 60)`, or 0 before the first full second
pub fn images_per_minute(processed: usize, elapsed_secs: i64) -> f64 {
    if elapsed_secs <= 0 {
        return 0.0;
    }
    processed as f64 / (elapsed_secs as f64 / 60.0)
}

/// Format seconds as `MM:SS` (minutes keep growing past 59)
pub fn format_elapsed(elapsed_secs: i64) -> String {
    let secs = elapsed_secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_rate_is_zero_at_start() {
        let clock = SessionClock::start();
        let snapshot = clock.throughput(5, clock.started_at());
        assert_eq!(snapshot.elapsed_secs, 0);
        assert_eq!(snapshot.images_per_minute, 0.0);
    }

    #[test]
    fn test_rate_per_minute() {
        let clock = SessionClock::start();
        let now = clock.started_at() + Duration::seconds(120);
        let snapshot = clock.throughput(30, now);
        assert_eq!(snapshot.elapsed_secs, 120);
        assert!((snapshot.images_per_minute - 15.0).abs() < 1e-9);

        let half_minute = clock.started_at() + Duration::seconds(30);
        assert!((clock.throughput(1, half_minute).images_per_minute - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_elapsed_never_negative() {
        let clock = SessionClock::start();
        let before = clock.started_at() - Duration::seconds(10);
        assert_eq!(clock.elapsed_seconds(before), 0);
    }

    #[test]
    fn test_numerator_follows_processed() {
        let clock = SessionClock::start();
        let now = clock.started_at() + Duration::seconds(60);
        let rates: Vec<f64> = (0..5).map(|n| clock.throughput(n, now).images_per_minute).collect();
        assert!(rates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(3725), "62:05");
        assert_eq!(format_elapsed(-3), "00:00");
    }
}
