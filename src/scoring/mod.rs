pub mod eligibility;
pub mod engine;
pub mod points;

pub use eligibility::{filter_eligible, is_eligible};
pub use engine::{
    compute_leaderboard, compute_leaderboard_with, explain_author, rank_positions,
    score_submission, upvote_bonus, LeaderboardEntry, PointContribution, SubmissionScore,
};
pub use points::PointSchedule;
