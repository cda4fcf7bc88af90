use std::time::{Duration, Instant};

/// Past this, the search is reported as a deep search.
pub const DEEP_SEARCH_AFTER: Duration = Duration::from_secs(5);

pub const INDEXING_MESSAGE: &str = "Indexing sources...";
pub const DEEP_SEARCH_MESSAGE: &str = "Deep search enabled...";

/// Cosmetic progress indicator for a running search. Never cancels anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTimer {
    started: Instant,
    stopped: Option<Instant>,
}

impl SearchTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            stopped: None,
        }
    }

    pub fn stop(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(Instant::now());
        }
    }

    pub fn elapsed(&self) -> Duration {
        let end = self.stopped.unwrap_or_else(Instant::now);
        end.saturating_duration_since(self.started)
    }

    /// Elapsed time as shown next to the message, in tenths of a second.
    pub fn display(&self) -> String {
        Self::display_for(self.elapsed())
    }

    pub fn display_for(elapsed: Duration) -> String {
        format!("{} {:.1}s", Self::message_for(elapsed), elapsed.as_secs_f32())
    }

    pub fn message(&self) -> &'static str {
        Self::message_for(self.elapsed())
    }

    pub fn message_for(elapsed: Duration) -> &'static str {
        if elapsed > DEEP_SEARCH_AFTER {
            DEEP_SEARCH_MESSAGE
        } else {
            INDEXING_MESSAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_switches_strictly_after_threshold() {
        assert_eq!(SearchTimer::message_for(Duration::ZERO), INDEXING_MESSAGE);
        assert_eq!(SearchTimer::message_for(DEEP_SEARCH_AFTER), INDEXING_MESSAGE);
        assert_eq!(
            SearchTimer::message_for(DEEP_SEARCH_AFTER + Duration::from_millis(1)),
            DEEP_SEARCH_MESSAGE
        );
    }

    #[test]
    fn display_shows_tenths() {
        assert_eq!(
            SearchTimer::display_for(Duration::from_millis(1200)),
            "Indexing sources... 1.2s"
        );
        assert_eq!(
            SearchTimer::display_for(Duration::from_millis(6300)),
            "Deep search enabled... 6.3s"
        );
    }

    #[test]
    fn stopped_timer_is_frozen() {
        let mut timer = SearchTimer::start();
        timer.stop();
        let frozen = timer.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.elapsed(), frozen);
    }
}
