use std::collections::BTreeMap;

use super::types::{Prompt, PromptType, Submission};

/// Group prompts by ISO year. Within a year the most recent week comes first.
pub fn group_by_year(prompts: &[Prompt]) -> BTreeMap<i32, Vec<&Prompt>> {
    let mut grouped: BTreeMap<i32, Vec<&Prompt>> = BTreeMap::new();
    for prompt in prompts {
        grouped.entry(prompt.iso_year).or_default().push(prompt);
    }
    for year_prompts in grouped.values_mut() {
        // Stable sort keeps source order between same-week prompts
        year_prompts.sort_by(|a, b| b.week.cmp(&a.week));
    }
    grouped
}

/// Years of a grouping, most recent first
pub fn years_descending<T>(grouped: &BTreeMap<i32, T>) -> Vec<i32> {
    grouped.keys().rev().copied().collect()
}

pub fn filter_by_type(prompts: &[Prompt], kind: PromptType) -> Vec<&Prompt> {
    prompts.iter().filter(|p| p.kind == kind).collect()
}

/// All prompts scheduled for a given ISO week, in source order
pub fn prompts_for_week(prompts: &[Prompt], year: i32, week: u8) -> Vec<&Prompt> {
    prompts
        .iter()
        .filter(|p| p.iso_year == year && p.week == week)
        .collect()
}

/// Select the canonical prompt for a slot.
///
/// With a type given, the row carrying the slot's generated id wins.
/// Otherwise, and when no row has that id, the first row matching year and
/// week (and type) in source order is used.
pub fn find_prompt(
    prompts: &[Prompt],
    year: i32,
    week: u8,
    kind: Option<PromptType>,
) -> Option<&Prompt> {
    let by_id = kind.and_then(|k| {
        let id = generate_prompt_id(k, year, week);
        prompts.iter().find(|p| p.id == id)
    });
    by_id.or_else(|| {
        prompts.iter().find(|p| {
            p.iso_year == year && p.week == week && kind.map_or(true, |k| p.kind == k)
        })
    })
}

pub fn submissions_for_prompt<'a>(
    submissions: &'a [Submission],
    prompt_id: &str,
) -> Vec<&'a Submission> {
    submissions
        .iter()
        .filter(|s| s.prompt_id == prompt_id)
        .collect()
}

/// Build the sheet's prompt id for a slot, e.g. "2024-W05-FIC"
pub fn generate_prompt_id(kind: PromptType, year: i32, week: u8) -> String {
    format!("{}-W{:02}-{}", year, week, kind.code())
}

/// "Week 05 (2024)"
pub fn week_label(week: u8, year: i32) -> String {
    format!("Week {:02} ({})", week, year)
}
