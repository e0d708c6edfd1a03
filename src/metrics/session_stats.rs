use std::time::{Duration, Instant};

/// Scoreboard that outlives individual sessions
///
/// Tracks the best score and number of finished games for the whole process,
/// plus a clock for the current session that stops when the snake crashes.
pub struct SessionStats {
    best_score: u32,
    games_played: u32,
    started: Instant,
    frozen_at: Option<Duration>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            best_score: 0,
            games_played: 0,
            started: Instant::now(),
            frozen_at: None,
        }
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Time spent in the current session
    pub fn elapsed(&self) -> Duration {
        self.frozen_at.unwrap_or_else(|| self.started.elapsed())
    }

    pub fn clock_label(&self) -> String {
        clock_label(self.elapsed())
    }

    pub fn record_start(&mut self) {
        self.started = Instant::now();
        self.frozen_at = None;
    }

    pub fn record_game_over(&mut self, final_score: u32) {
        if self.frozen_at.is_none() {
            self.frozen_at = Some(self.started.elapsed());
        }
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// `mm:ss`, with minutes allowed past 59
fn clock_label(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(Duration::ZERO), "00:00");
        assert_eq!(clock_label(Duration::from_millis(59_999)), "00:59");
        assert_eq!(clock_label(Duration::from_secs(754)), "12:34");
        assert_eq!(clock_label(Duration::from_secs(100 * 60 + 1)), "100:01");
    }

    #[test]
    fn test_best_score_only_rises() {
        let mut stats = SessionStats::new();

        for (score, best) in [(4, 4), (2, 4), (9, 9), (0, 9)] {
            stats.record_game_over(score);
            assert_eq!(stats.best_score(), best);
        }
        assert_eq!(stats.games_played(), 4);
    }

    #[test]
    fn test_clock_stops_at_game_over_and_restarts() {
        let mut stats = SessionStats::new();
        std::thread::sleep(Duration::from_millis(20));
        stats.record_game_over(1);
        let stopped = stats.elapsed();
        assert!(stopped >= Duration::from_millis(20));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(stats.elapsed(), stopped);

        stats.record_start();
        assert!(stats.elapsed() < stopped);
        assert_eq!(stats.games_played(), 1);
    }
}
