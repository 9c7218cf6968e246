use crate::archive::types::Submission;

/// A submission counts toward the leaderboard only when its validity flag is
/// exactly YES, in any case. Padded values do not count.
pub fn is_eligible(submission: &Submission) -> bool {
    submission
        .validity
        .as_deref()
        .is_some_and(|v| v.eq_ignore_ascii_case("YES"))
}

/// Keep only eligible submissions, preserving input order
pub fn filter_eligible(submissions: &[Submission]) -> Vec<&Submission> {
    submissions.iter().filter(|s| is_eligible(s)).collect()
}
