use std::collections::HashMap;

use serde::Serialize;

use super::eligibility::filter_eligible;
use super::points::PointSchedule;
use crate::archive::types::{Submission, WinnerRank};

/// One author's all-time total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub points: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointContribution {
    pub label: &'static str, // e.g. "Submission", "1st place", "Upvotes"
    pub description: String, // e.g. "130 upvotes / 25 -> +5"
    pub points: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionScore {
    pub points: u64,
    pub breakdown: Vec<PointContribution>,
}

/// Upvote bonus for one submission: +1 per full block, capped.
/// Absent upvote counts score as zero.
pub fn upvote_bonus(upvotes: Option<u64>, schedule: &PointSchedule) -> u64 {
    upvotes
        .unwrap_or(0)
        .checked_div(schedule.upvote_block)
        .unwrap_or(0)
        .min(schedule.upvote_cap)
}

fn placement_points(rank: WinnerRank, schedule: &PointSchedule) -> u64 {
    match rank {
        WinnerRank::First => schedule.first,
        WinnerRank::Second => schedule.second,
        WinnerRank::Third => schedule.third,
    }
}

fn placement_label(rank: WinnerRank) -> &'static str {
    match rank {
        WinnerRank::First => "1st place",
        WinnerRank::Second => "2nd place",
        WinnerRank::Third => "3rd place",
    }
}

/// Score a single submission, assuming it is eligible.
pub fn score_submission(submission: &Submission, schedule: &PointSchedule) -> SubmissionScore {
    let mut breakdown = vec![PointContribution {
        label: "Submission",
        description: "valid entry".to_string(),
        points: schedule.submit,
    }];

    if let Some(rank) = submission.winner_rank {
        breakdown.push(PointContribution {
            label: placement_label(rank),
            description: format!("winner rank {}", rank.number()),
            points: placement_points(rank, schedule),
        });
    }

    let bonus = upvote_bonus(submission.upvotes, schedule);
    if bonus > 0 {
        let upvotes = submission.upvotes.unwrap_or(0);
        let capped = if upvotes / schedule.upvote_block > schedule.upvote_cap {
            " (capped)"
        } else {
            ""
        };
        breakdown.push(PointContribution {
            label: "Upvotes",
            description: format!(
                "{} upvotes / {} -> +{}{}",
                upvotes, schedule.upvote_block, bonus, capped
            ),
            points: bonus,
        });
    }

    SubmissionScore {
        points: breakdown.iter().map(|c| c.points).sum(),
        breakdown,
    }
}

/// Build the ranked leaderboard under the standard schedule.
///
/// Ineligible submissions are dropped first. Entries are ordered by points
/// descending, then username ascending, so equal input sets always rank
/// identically regardless of input order.
pub fn compute_leaderboard(submissions: &[Submission]) -> Vec<LeaderboardEntry> {
    compute_leaderboard_with(submissions, &PointSchedule::STANDARD)
}

pub fn compute_leaderboard_with(
    submissions: &[Submission],
    schedule: &PointSchedule,
) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for submission in filter_eligible(submissions) {
        let score = score_submission(submission, schedule);
        *totals.entry(submission.author.as_str()).or_insert(0) += score.points;
    }

    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|(username, points)| LeaderboardEntry {
            username: username.to_string(),
            points,
        })
        .collect();

    // Primary: points descending. Tie-breaker: username ascending
    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.username.cmp(&b.username))
    });
    entries
}

/// Eligible submissions of one author with their individual scores
pub fn explain_author<'a>(
    submissions: &'a [Submission],
    username: &str,
    schedule: &PointSchedule,
) -> Vec<(&'a Submission, SubmissionScore)> {
    filter_eligible(submissions)
        .into_iter()
        .filter(|s| s.author == username)
        .map(|s| (s, score_submission(s, schedule)))
        .collect()
}

/// Display positions using competition ranking: equal totals share a
/// position and the next distinct total skips ahead ("1, 2, 2, 4").
/// Expects entries already sorted by points descending.
pub fn rank_positions(entries: &[LeaderboardEntry]) -> Vec<usize> {
    let mut positions = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let position = match idx.checked_sub(1).map(|prev| &entries[prev]) {
            Some(prev) if prev.points == entry.points => positions[idx - 1],
            _ => idx + 1,
        };
        positions.push(position);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::normalize_submissions;
    use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
    use serde_json::json;

    fn sub(author: &str, valid: Option<&str>, rank: Option<WinnerRank>, upvotes: Option<u64>) -> Submission {
        Submission {
            id: format!("{}-{:?}-{:?}", author, rank, upvotes),
            prompt_id: "2024-W05-FIC".to_string(),
            author: author.to_string(),
            title: "Entry".to_string(),
            post_url: "https://reddit.com/r/redrising/x".to_string(),
            kind: None,
            week: None,
            iso_year: None,
            upvotes,
            comments: None,
            winner_rank: rank,
            spoilers: None,
            created_at: None,
            validity: valid.map(str::to_string),
            generated_title: None,
        }
    }

    fn entry(username: &str, points: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            username: username.to_string(),
            points,
        }
    }

    fn random_submissions(rng: &mut SmallRng, count: usize) -> Vec<Submission> {
        let authors = ["ares", "mustang", "sevro", "victra", "ragnar"];
        let validity = [Some("YES"), Some("yes"), Some("NO"), None, Some("pending")];
        (0..count)
            .map(|_| {
                let author = *authors.choose(rng).unwrap();
                let valid = *validity.choose(rng).unwrap();
                let rank = WinnerRank::from_number(rng.gen_range(0..5));
                let upvotes = match rng.gen_range(0..4) {
                    0 => None,
                    _ => Some(rng.gen_range(0..2_000)),
                };
                sub(author, valid, rank, upvotes)
            })
            .collect()
    }

    #[test]
    fn test_first_place_no_upvotes() {
        let result = compute_leaderboard(&[sub("a", Some("YES"), Some(WinnerRank::First), Some(0))]);
        assert_eq!(result, vec![entry("a", 20)]);
    }

    #[test]
    fn test_upvote_bonus_uncapped() {
        let result = compute_leaderboard(&[sub("b", Some("YES"), None, Some(130))]);
        assert_eq!(result, vec![entry("b", 10)]);
    }

    #[test]
    fn test_upvote_bonus_capped() {
        let result = compute_leaderboard(&[sub("c", Some("YES"), None, Some(1000))]);
        assert_eq!(result, vec![entry("c", 15)]);
    }

    #[test]
    fn test_ineligible_contributes_nothing() {
        let result = compute_leaderboard(&[sub("d", Some("NO"), Some(WinnerRank::First), Some(1000))]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_same_author_sums_into_one_entry() {
        let result = compute_leaderboard(&[
            sub("e", Some("YES"), Some(WinnerRank::Second), Some(0)),
            sub("e", Some("YES"), None, Some(0)),
        ]);
        assert_eq!(result, vec![entry("e", 18)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_leaderboard(&[]).is_empty());
    }

    #[test]
    fn test_third_place_and_missing_upvotes() {
        let result = compute_leaderboard(&[sub("f", Some("yes"), Some(WinnerRank::Third), None)]);
        assert_eq!(result, vec![entry("f", 10)]);
    }

    #[test]
    fn test_upvote_bonus_boundaries() {
        let schedule = PointSchedule::STANDARD;
        assert_eq!(upvote_bonus(None, &schedule), 0);
        assert_eq!(upvote_bonus(Some(24), &schedule), 0);
        assert_eq!(upvote_bonus(Some(25), &schedule), 1);
        assert_eq!(upvote_bonus(Some(249), &schedule), 9);
        assert_eq!(upvote_bonus(Some(250), &schedule), 10);
        assert_eq!(upvote_bonus(Some(10_000), &schedule), 10);
    }

    #[test]
    fn test_huge_upvotes_add_exactly_cap() {
        let schedule = PointSchedule::STANDARD;
        let plain = score_submission(&sub("g", Some("YES"), None, Some(10_000)), &schedule);
        assert_eq!(plain.points, 5 + 10);
        let winner = score_submission(
            &sub("g", Some("YES"), Some(WinnerRank::First), Some(10_000)),
            &schedule,
        );
        assert_eq!(winner.points, 5 + 15 + 10);
    }

    #[test]
    fn test_ties_broken_by_username() {
        let result = compute_leaderboard(&[
            sub("zed", Some("YES"), None, None),
            sub("amy", Some("YES"), None, None),
            sub("max", Some("YES"), Some(WinnerRank::First), None),
        ]);
        assert_eq!(
            result,
            vec![entry("max", 20), entry("amy", 5), entry("zed", 5)]
        );
    }

    #[test]
    fn test_usernames_are_case_sensitive() {
        let result = compute_leaderboard(&[
            sub("Sevro", Some("YES"), None, None),
            sub("sevro", Some("YES"), None, None),
        ]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_breakdown_lists_each_award() {
        let score = score_submission(
            &sub("h", Some("YES"), Some(WinnerRank::Second), Some(300)),
            &PointSchedule::STANDARD,
        );
        let labels: Vec<&str> = score.breakdown.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Submission", "2nd place", "Upvotes"]);
        assert_eq!(score.points, 5 + 8 + 10);
        assert!(score.breakdown[2].description.contains("(capped)"));
    }

    #[test]
    fn test_breakdown_omits_zero_bonus() {
        let score = score_submission(&sub("i", Some("YES"), None, Some(10)), &PointSchedule::STANDARD);
        assert_eq!(score.breakdown.len(), 1);
        assert_eq!(score.points, 5);
    }

    #[test]
    fn test_explain_author_only_eligible() {
        let subs = vec![
            sub("j", Some("YES"), Some(WinnerRank::First), None),
            sub("j", Some("NO"), Some(WinnerRank::First), None),
            sub("k", Some("YES"), None, None),
        ];
        let explained = explain_author(&subs, "j", &PointSchedule::STANDARD);
        assert_eq!(explained.len(), 1);
        assert_eq!(explained[0].1.points, 20);
        let total: u64 = explained.iter().map(|(_, s)| s.points).sum();
        let board = compute_leaderboard(&subs);
        assert_eq!(board.iter().find(|e| e.username == "j").unwrap().points, total);
    }

    #[test]
    fn test_padded_validity_row_scores_nothing() {
        let rows = vec![json!({
            "Submission_ID (auto)": "S-1",
            "Prompt_ID (choose)": "2024-W05-FIC",
            "Author_Username": "d",
            "Submission_Title": "Entry",
            "Reddit_Post_URL": "https://reddit.com/r/redrising/x",
            "Votes_Valid": " YES\n",
            "Winner_Rank": 1,
            "Upvotes": 1000
        })];
        let subs = normalize_submissions(rows).unwrap();
        assert!(compute_leaderboard(&subs).is_empty());
    }

    #[test]
    fn test_rank_positions_competition_style() {
        let entries = vec![entry("a", 30), entry("b", 20), entry("c", 20), entry("d", 5)];
        assert_eq!(rank_positions(&entries), vec![1, 2, 2, 4]);
        assert!(rank_positions(&[]).is_empty());
    }

    #[test]
    fn test_property_order_independent_and_idempotent() {
        let mut rng = SmallRng::seed_from_u64(0x9E37_79B9_7F4A_7C15);
        for round in 0..50 {
            let mut subs = random_submissions(&mut rng, 1 + round);
            let baseline = compute_leaderboard(&subs);
            assert_eq!(compute_leaderboard(&subs), baseline);
            for _ in 0..5 {
                subs.shuffle(&mut rng);
                assert_eq!(compute_leaderboard(&subs), baseline);
            }
        }
    }

    #[test]
    fn test_property_ineligible_never_scores() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let subs = random_submissions(&mut rng, 30);
            let board = compute_leaderboard(&subs);
            for e in &board {
                let expected: u64 = subs
                    .iter()
                    .filter(|s| s.author == e.username)
                    .filter(|s| s.validity.as_deref().is_some_and(|v| v.eq_ignore_ascii_case("YES")))
                    .map(|s| score_submission(s, &PointSchedule::STANDARD).points)
                    .sum();
                assert_eq!(e.points, expected);
                assert!(e.points >= PointSchedule::STANDARD.submit);
            }
            // Every listed author has at least one eligible submission
            let eligible_authors: std::collections::HashSet<&str> = filter_eligible(&subs)
                .iter()
                .map(|s| s.author.as_str())
                .collect();
            assert_eq!(board.len(), eligible_authors.len());
        }
    }

    #[test]
    fn test_property_sorted_descending() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let board = compute_leaderboard(&random_submissions(&mut rng, 40));
            for pair in board.windows(2) {
                assert!(
                    pair[0].points > pair[1].points
                        || (pair[0].points == pair[1].points && pair[0].username < pair[1].username)
                );
            }
        }
    }
}
