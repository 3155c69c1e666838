//! Timestamp helpers
//!
//! Stored timestamps carry millisecond precision so that values read back
//! from the store compare equal to the ones that were written.

use chrono::{DateTime, Duration, DurationRound, Utc};

/// Current UTC time truncated to whole milliseconds
pub fn now() -> DateTime<Utc> {
	truncate(Utc::now())
}

/// A timestamp strictly after `previous`, as close to now as possible
pub fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
	let current = now();
	let floor = truncate(previous) + Duration::milliseconds(1);
	current.max(floor)
}

fn truncate(at: DateTime<Utc>) -> DateTime<Utc> {
	at.duration_trunc(Duration::milliseconds(1)).unwrap_or(at)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Timelike;

	#[test]
	fn now_has_millisecond_precision() {
		let at = now();
		assert_eq!(at.nanosecond() % 1_000_000, 0);
	}

	#[test]
	fn advance_moves_past_a_future_timestamp() {
		let ahead = now() + Duration::seconds(30);
		let next = advance(ahead);
		assert_eq!(next, ahead + Duration::milliseconds(1));
	}

	#[test]
	fn advance_uses_the_clock_when_it_is_ahead() {
		let earlier = now() - Duration::seconds(30);
		let next = advance(earlier);
		assert!(next > earlier + Duration::seconds(29));
	}
}
