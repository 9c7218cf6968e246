use serde_json::Value;

use super::raw::{loose_count, loose_integer, value_kind, PromptRaw, SubmissionRaw};
use super::types::{Prompt, PromptStatus, PromptType, SpoilerFlag, Submission, WinnerRank};
use crate::error::{ArchiveError, RecordKind};

/// Map one raw prompt row to the canonical shape.
///
/// Returns the reason text on failure; batch functions attach the index.
pub fn normalize_prompt(raw: PromptRaw) -> Result<Prompt, String> {
    let week = required_integer(&raw.week, "Week (ISO)")?;
    if !(1..=53).contains(&week) {
        return Err(format!("ISO week {} is outside 1-53", week));
    }
    let iso_year = required_integer(&raw.iso_year, "ISO_Year")?;
    let iso_year = i32::try_from(iso_year)
        .map_err(|_| format!("ISO year {} is out of range", iso_year))?;

    let kind = PromptType::parse(&raw.kind)
        .ok_or_else(|| format!("unknown prompt type '{}'", raw.kind))?;
    let status = PromptStatus::parse(&raw.status)
        .ok_or_else(|| format!("unknown prompt status '{}'", raw.status))?;

    Ok(Prompt {
        id: raw.id,
        kind,
        week: week as u8,
        iso_year,
        title: raw.title,
        theme: raw.theme,
        thread_url: raw.post_url,
        opens_at: raw.start_date,
        closes_at: raw.end_date,
        status,
        winners: raw.winners,
        notes: raw.notes,
        thread_title: raw.reddit_title,
        total_submissions: raw.total_submissions.as_ref().and_then(loose_count),
        total_votes: raw.total_votes.as_ref().and_then(loose_count),
    })
}

/// Map one raw submission row to the canonical shape.
pub fn normalize_submission(raw: SubmissionRaw) -> Result<Submission, String> {
    Ok(Submission {
        id: raw.id,
        prompt_id: raw.prompt_id,
        author: raw.author,
        title: raw.title,
        post_url: raw.post_url,
        kind: raw.kind.as_deref().and_then(PromptType::parse),
        week: raw
            .week
            .as_ref()
            .and_then(loose_integer)
            .and_then(|w| u8::try_from(w).ok())
            .filter(|w| (1..=53).contains(w)),
        iso_year: raw
            .iso_year
            .as_ref()
            .and_then(loose_integer)
            .and_then(|y| i32::try_from(y).ok()),
        upvotes: raw.upvotes.as_ref().and_then(loose_count),
        comments: raw.comments.as_ref().and_then(loose_count),
        winner_rank: raw
            .winner_rank
            .as_ref()
            .and_then(loose_integer)
            .and_then(WinnerRank::from_number),
        spoilers: raw.spoilers.as_deref().map(normalize_spoiler),
        created_at: raw.created_at,
        validity: raw.votes_valid,
        generated_title: raw.generated_title,
    })
}

/// Present spoiler cells are YES only when they read exactly YES (any case).
fn normalize_spoiler(raw: &str) -> SpoilerFlag {
    if raw.eq_ignore_ascii_case("YES") {
        SpoilerFlag::Yes
    } else {
        SpoilerFlag::No
    }
}

fn required_integer(value: &Value, field: &str) -> Result<i64, String> {
    if value.is_null() {
        return Err(format!("missing field `{}`", field));
    }
    loose_integer(value).ok_or_else(|| {
        format!(
            "field `{}` must be a whole number, found {}",
            field,
            value_kind(value)
        )
    })
}

/// Normalize a batch of raw prompt rows. One malformed row fails the batch.
pub fn normalize_prompts(records: Vec<Value>) -> Result<Vec<Prompt>, ArchiveError> {
    normalize_batch(records, RecordKind::Prompt, normalize_prompt)
}

/// Normalize a batch of raw submission rows. One malformed row fails the batch.
pub fn normalize_submissions(records: Vec<Value>) -> Result<Vec<Submission>, ArchiveError> {
    normalize_batch(records, RecordKind::Submission, normalize_submission)
}

fn normalize_batch<R, T, F>(
    records: Vec<Value>,
    kind: RecordKind,
    convert: F,
) -> Result<Vec<T>, ArchiveError>
where
    R: serde::de::DeserializeOwned,
    F: Fn(R) -> Result<T, String>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let malformed = |reason: String| ArchiveError::MalformedRecord {
                kind,
                index,
                reason,
            };
            let raw: R = serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
            convert(raw).map_err(malformed)
        })
        .collect()
}
