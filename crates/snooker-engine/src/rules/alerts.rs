use std::collections::VecDeque;

use crate::core::time::{format_local_time, Timestamp};

/// A foul/status message shown next to the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// `HH:MM:SS: message`, in the player's local time.
    pub text: String,
    /// Wall-clock milliseconds at which the alert was raised.
    pub raised_at_ms: f64,
}

/// Bounded, time-expiring message feed.
/// Oldest entries are evicted beyond `capacity`; every entry also expires
/// `ttl_ms` of wall-clock time after it was pushed, whichever happens first.
#[derive(Debug, Clone)]
pub struct AlertFeed {
    entries: VecDeque<Alert>,
    capacity: usize,
    ttl_ms: f64,
}

impl AlertFeed {
    pub fn new(capacity: usize, ttl_ms: f64) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            ttl_ms,
        }
    }

    /// Append a message stamped with the wall-clock time. Returns the
    /// formatted text.
    pub fn push(&mut self, message: &str, now: Timestamp) -> String {
        let text = format!("{}: {}", format_local_time(now.wall_ms), message);
        self.entries.push_back(Alert {
            text: text.clone(),
            raised_at_ms: now.wall_ms,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        text
    }

    /// Drop entries whose lifetime has run out at wall-clock `now_ms`.
    pub fn expire(&mut self, now_ms: f64) {
        let ttl = self.ttl_ms;
        self.entries.retain(|a| now_ms - a.raised_at_ms < ttl);
    }

    /// Messages visible at wall-clock `now_ms`, oldest first.
    pub fn visible(&self, now_ms: f64) -> impl Iterator<Item = &Alert> {
        let ttl = self.ttl_ms;
        self.entries.iter().filter(move |a| now_ms - a.raised_at_ms < ttl)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: f64) -> Timestamp {
        Timestamp {
            game_ms: ms,
            wall_ms: ms,
        }
    }

    #[test]
    fn never_shows_more_than_capacity() {
        let mut feed = AlertFeed::new(4, 30_000.0);
        for i in 0..6 {
            feed.push(&format!("foul {}", i), at(i as f64 * 100.0));
        }
        let shown: Vec<_> = feed.visible(600.0).map(|a| a.text.clone()).collect();
        assert_eq!(shown.len(), 4);
        assert!(shown[0].ends_with("foul 2"));
        assert!(shown[3].ends_with("foul 5"));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let mut feed = AlertFeed::new(4, 30_000.0);
        feed.push("early", at(0.0));
        feed.push("late", at(10_000.0));
        assert_eq!(feed.visible(29_999.0).count(), 2);
        assert_eq!(feed.visible(30_000.0).count(), 1);
        feed.expire(40_000.0);
        assert!(feed.is_empty());
    }

    #[test]
    fn text_carries_local_time_prefix() {
        let mut feed = AlertFeed::new(4, 30_000.0);
        let text = feed.push("Foul", Timestamp { game_ms: 0.0, wall_ms: 3_723_000.0 });
        assert_eq!(text, format!("{}: Foul", format_local_time(3_723_000.0)));
    }

    #[test]
    fn expiry_ignores_game_time() {
        let mut feed = AlertFeed::new(4, 30_000.0);
        // Game time crawls while the wall clock runs on
        feed.push("Foul", Timestamp { game_ms: 100.0, wall_ms: 50_000.0 });
        assert_eq!(feed.visible(79_999.0).count(), 1);
        assert_eq!(feed.visible(80_000.0).count(), 0);
        feed.expire(80_000.0);
        assert!(feed.is_empty());
    }
}
