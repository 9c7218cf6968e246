use serde::Serialize;

/// Point schedule for the all-time leaderboard.
///
/// [`PointSchedule::STANDARD`] is the only schedule the archive publishes.
/// The engine, the `rules` command and the degraded-state text all read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointSchedule {
    /// Flat award for every eligible submission
    pub submit: u64,
    pub first: u64,
    pub second: u64,
    pub third: u64,
    /// Upvotes needed per bonus point
    pub upvote_block: u64,
    /// Maximum upvote bonus per submission
    pub upvote_cap: u64,
}

impl PointSchedule {
    pub const STANDARD: PointSchedule = PointSchedule {
        submit: 5,
        first: 15,
        second: 8,
        third: 5,
        upvote_block: 25,
        upvote_cap: 10,
    };

    /// One-line summary of the schedule
    pub fn summary(&self) -> String {
        format!(
            "+{} per valid submission; +{}/+{}/+{} for 1st/2nd/3rd; +1 per {} upvotes (capped at +{})",
            self.submit, self.first, self.second, self.third, self.upvote_block, self.upvote_cap
        )
    }
}

impl Default for PointSchedule {
    fn default() -> Self {
        Self::STANDARD
    }
}
