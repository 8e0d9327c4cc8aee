use time::{Duration, OffsetDateTime};

/// Change-history entries older than this many days are eligible for purge.
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

/// The timestamp before which history entries may be purged.
pub fn horizon(now: OffsetDateTime, retention_days: i64) -> OffsetDateTime {
	now - Duration::days(retention_days.max(0))
}
