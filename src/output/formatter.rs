use std::io::IsTerminal;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::archive::{
    group_by_year, submissions_for_prompt, week_label, years_descending, Prompt, PromptStatus,
    Submission, WinnerRank,
};
use crate::error::{ArchiveError, ErrorCategory};
use crate::scoring::{rank_positions, LeaderboardEntry, PointSchedule, SubmissionScore};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Fit text into what is left of the terminal line after `fixed_width` columns
fn fit_to_terminal(text: &str, fixed_width: usize) -> String {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => truncate_title(text, width - fixed_width),
        Some(_) => truncate_title(text, 20),
        None => text.to_string(),
    }
}

/// Render a date cell for display ("Jan 29, 2024").
/// Values that don't parse are shown as they came from the sheet.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
    {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

pub fn winner_label(rank: WinnerRank) -> &'static str {
    match rank {
        WinnerRank::First => "1st",
        WinnerRank::Second => "2nd",
        WinnerRank::Third => "3rd",
    }
}

fn format_status(status: PromptStatus, use_colors: bool) -> String {
    let label = status.to_string();
    if !use_colors {
        return label;
    }
    match status {
        PromptStatus::Upcoming => label.blue().to_string(),
        PromptStatus::Active => label.green().to_string(),
        PromptStatus::Closed => label.dimmed().to_string(),
    }
}

fn format_winner(rank: WinnerRank, use_colors: bool) -> String {
    let label = winner_label(rank);
    if !use_colors {
        return label.to_string();
    }
    match rank {
        WinnerRank::First => label.yellow().bold().to_string(),
        WinnerRank::Second => label.white().bold().to_string(),
        WinnerRank::Third => label.red().bold().to_string(),
    }
}

/// Format the leaderboard as a ranked table with columns: Position, Points, Username
/// Tied totals share a position. No headers.
pub fn format_leaderboard_table(entries: &[LeaderboardEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "Leaderboard coming soon. Rankings appear once valid submissions come in."
            .to_string();
    }

    let positions = rank_positions(entries);
    let points_width = entries
        .iter()
        .map(|e| e.points.to_string().len())
        .max()
        .unwrap_or(1)
        .max(3);
    let index_width = 4;
    let separator = "  ";
    let fixed_width = index_width + 1 + points_width + separator.len();

    entries
        .iter()
        .zip(positions)
        .map(|(entry, position)| {
            let index_str = format!("{:>3}.", position);
            let points_padded = format!("{:>width$}", entry.points, width = points_width);
            let username = fit_to_terminal(&entry.username, fixed_width);

            if use_colors {
                let name = if position == 1 {
                    username.yellow().bold().to_string()
                } else {
                    username
                };
                format!(
                    "{} {}{}{}",
                    index_str.dimmed(),
                    points_padded.bold(),
                    separator,
                    name
                )
            } else {
                format!("{} {}{}{}", index_str, points_padded, separator, username)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the leaderboard as tab-separated values for scripting
/// Columns: position, username, points (no headers, no colors)
pub fn format_leaderboard_tsv(entries: &[LeaderboardEntry]) -> String {
    rank_positions(entries)
        .into_iter()
        .zip(entries)
        .map(|(position, entry)| format!("{}\t{}\t{}", position, entry.username, entry.points))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed JSON for any serializable output
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// The scoring methodology, one rule per line
pub fn format_rules(schedule: &PointSchedule) -> String {
    [
        "Scoring methodology".to_string(),
        format!("  +{:<3} valid submission", schedule.submit),
        format!("  +{:<3} 1st place", schedule.first),
        format!("  +{:<3} 2nd place", schedule.second),
        format!("  +{:<3} 3rd place", schedule.third),
        format!(
            "  +1   per {} upvotes, capped at +{} per submission",
            schedule.upvote_block, schedule.upvote_cap
        ),
        "Only submissions marked valid (YES) count toward the leaderboard.".to_string(),
    ]
    .join("\n")
}

/// Degraded state shown instead of a leaderboard when loading fails.
/// Never includes partial results; always names the scoring rules.
pub fn format_unavailable(err: &ArchiveError, schedule: &PointSchedule) -> String {
    let headline = match err.category() {
        ErrorCategory::Configuration => "Data source not connected.",
        ErrorCategory::Transport => "Unable to load leaderboard data. Please check back later.",
        ErrorCategory::MalformedRecord => {
            "Leaderboard data is incomplete, so no rankings are shown."
        }
    };
    format!(
        "No leaderboard data available.\n{}\n  ({})\n\nWhen data is available, contributors are ranked by: {}.",
        headline,
        err,
        schedule.summary()
    )
}

/// One line per prompt, grouped under year headings (most recent first)
pub fn format_prompt_archive(prompts: &[Prompt], use_colors: bool) -> String {
    if prompts.is_empty() {
        return "No prompts found.".to_string();
    }

    let grouped = group_by_year(prompts);
    let mut sections = Vec::new();
    for year in years_descending(&grouped) {
        let mut lines = vec![if use_colors {
            year.bold().to_string()
        } else {
            year.to_string()
        }];
        for prompt in &grouped[&year] {
            lines.push(format_prompt_line(prompt, use_colors));
        }
        sections.push(lines.join("\n"));
    }
    sections.join("\n\n")
}

fn format_prompt_line(prompt: &Prompt, use_colors: bool) -> String {
    let label = week_label(prompt.week, prompt.iso_year);
    let kind = format!("{:<10}", prompt.kind.display_name());
    let status = format_status(prompt.status, use_colors);
    let fixed_width = 2 + label.len() + 2 + kind.len() + 2 + 10;
    let title = fit_to_terminal(&prompt.title, fixed_width);
    if use_colors {
        format!("  {}  {}  {}  {}", label.dimmed(), kind.cyan(), title, status)
    } else {
        format!("  {}  {}  {}  {}", label, kind, title, status)
    }
}

/// Detailed view of the prompts in one week and their submissions
pub fn format_week_detail(prompts: &[&Prompt], submissions: &[Submission], use_colors: bool) -> String {
    prompts
        .iter()
        .map(|prompt| {
            let entries = submissions_for_prompt(submissions, &prompt.id);
            format_prompt_detail(prompt, &entries, use_colors)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_prompt_detail(prompt: &Prompt, submissions: &[&Submission], use_colors: bool) -> String {
    let heading = format!(
        "{} {}: {}",
        week_label(prompt.week, prompt.iso_year),
        prompt.kind.display_name(),
        prompt.title
    );
    let mut lines = vec![
        if use_colors {
            heading.bold().to_string()
        } else {
            heading
        },
        format!("  Status: {}", format_status(prompt.status, use_colors)),
        format!(
            "  Open: {} - {}",
            format_date(&prompt.opens_at),
            format_date(&prompt.closes_at)
        ),
        format!("  Thread: {}", prompt.thread_url),
    ];
    if let Some(ref theme) = prompt.theme {
        lines.push(format!("  Theme: {}", theme));
    }
    let winners = prompt.winner_names();
    if !winners.is_empty() {
        lines.push(format!("  Winners: {}", winners.join(", ")));
    }
    if let Some(ref notes) = prompt.notes {
        lines.push(format!("  Notes: {}", notes));
    }

    if submissions.is_empty() {
        lines.push("  No submissions yet.".to_string());
    } else {
        lines.push(format!("  Submissions ({}):", submissions.len()));
        for submission in submissions {
            lines.push(format_submission_line(submission, use_colors));
        }
    }
    lines.join("\n")
}

fn format_submission_line(submission: &Submission, use_colors: bool) -> String {
    let mut tags = Vec::new();
    if let Some(rank) = submission.winner_rank {
        tags.push(format_winner(rank, use_colors));
    }
    if submission.has_spoilers() {
        tags.push("spoilers".to_string());
    }
    if let Some(upvotes) = submission.upvotes {
        tags.push(format!("{} upvotes", upvotes));
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags.join(", "))
    };

    let author = if use_colors {
        submission.author.yellow().to_string()
    } else {
        submission.author.clone()
    };
    format!(
        "    - {} by {}{}\n      {}",
        submission.title, author, tags, submission.post_url
    )
}

/// Per-submission breakdown of one contributor's points
pub fn format_explain(
    username: &str,
    scored: &[(&Submission, SubmissionScore)],
    use_colors: bool,
) -> String {
    if scored.is_empty() {
        return format!("No valid submissions found for {}.", username);
    }

    let total: u64 = scored.iter().map(|(_, s)| s.points).sum();
    let mut lines = vec![format!(
        "{}: {} points from {} valid submission{}",
        username,
        total,
        scored.len(),
        if scored.len() == 1 { "" } else { "s" }
    )];
    for (submission, score) in scored {
        let header = format!("  {} ({}) +{}", submission.title, submission.prompt_id, score.points);
        lines.push(if use_colors {
            header.bold().to_string()
        } else {
            header
        });
        for contribution in &score.breakdown {
            lines.push(format!(
                "    {:>3}  {}: {}",
                format!("+{}", contribution.points),
                contribution.label,
                contribution.description
            ));
        }
    }
    lines.join("\n")
}
