/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    /// 1-based position of the cursor; 0 for an empty queue.
    pub position: usize,
    pub answered: usize,
    pub correct: usize,
    /// Entries skipped because their question no longer exists.
    pub skipped: usize,
    pub remaining: usize,
    pub is_finished: bool,
}

impl SessionProgress {
    /// Share of submitted answers judged correct, 0–100.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.answered == 0 {
            return 0;
        }
        let pct = (self.correct as f64 / self.answered as f64) * 100.0;
        pct.round() as u32
    }
}
