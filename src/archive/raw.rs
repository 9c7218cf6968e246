//! Raw record schema (v1) as served by the spreadsheet endpoint.
//!
//! Column names carry the sheet's annotations ("(auto)", "(ISO)", ...) and
//! cell values are loosely typed: numbers may arrive as strings, text may
//! arrive as numbers, blank cells arrive as `""` or `null`. All of that
//! tolerance lives here and in [`super::normalize`].

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct PromptRaw {
    #[serde(rename = "Prompt_ID (auto)", deserialize_with = "text")]
    pub id: String,
    #[serde(rename = "Week (ISO)", default)]
    pub week: Value,
    #[serde(rename = "Type", deserialize_with = "text")]
    pub kind: String,
    #[serde(rename = "Title", deserialize_with = "text")]
    pub title: String,
    #[serde(rename = "Start_Date (Oslo)", deserialize_with = "text")]
    pub start_date: String,
    #[serde(rename = "End_Date (Oslo)", deserialize_with = "text")]
    pub end_date: String,
    #[serde(rename = "ISO_Year", default)]
    pub iso_year: Value,
    #[serde(rename = "Status", deserialize_with = "text")]
    pub status: String,
    #[serde(rename = "Reddit_Post_URL", deserialize_with = "text")]
    pub post_url: String,
    #[serde(rename = "Theme", default, deserialize_with = "optional_text")]
    pub theme: Option<String>,
    #[serde(rename = "Reddit_Title (auto)", default, deserialize_with = "optional_text")]
    pub reddit_title: Option<String>,
    #[serde(rename = "Total_Submissions", default)]
    pub total_submissions: Option<Value>,
    #[serde(rename = "Total_Votes", default)]
    pub total_votes: Option<Value>,
    #[serde(rename = "Winners (Usernames)", default, deserialize_with = "optional_text")]
    pub winners: Option<String>,
    #[serde(rename = "Notes", default, deserialize_with = "optional_text")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRaw {
    #[serde(rename = "Submission_ID (auto)", deserialize_with = "text")]
    pub id: String,
    #[serde(rename = "Prompt_ID (choose)", deserialize_with = "text")]
    pub prompt_id: String,
    #[serde(rename = "Week (auto)", default)]
    pub week: Option<Value>,
    #[serde(rename = "ISO_Year (auto)", default)]
    pub iso_year: Option<Value>,
    #[serde(rename = "Type (auto)", default, deserialize_with = "optional_text")]
    pub kind: Option<String>,
    #[serde(rename = "Author_Username", deserialize_with = "text")]
    pub author: String,
    #[serde(rename = "Submission_Title", deserialize_with = "text")]
    pub title: String,
    #[serde(rename = "Reddit_Post_URL", deserialize_with = "text")]
    pub post_url: String,
    #[serde(rename = "Upvotes", default)]
    pub upvotes: Option<Value>,
    #[serde(rename = "Comments", default)]
    pub comments: Option<Value>,
    #[serde(rename = "Created_At", default, deserialize_with = "optional_text")]
    pub created_at: Option<String>,
    #[serde(rename = "Votes_Valid", default, deserialize_with = "optional_text")]
    pub votes_valid: Option<String>,
    #[serde(rename = "Winner_Rank", default)]
    pub winner_rank: Option<Value>,
    #[serde(rename = "Spoilers", default, deserialize_with = "optional_text")]
    pub spoilers: Option<String>,
    #[serde(
        rename = "Generated_Reddit_Title (auto)",
        default,
        deserialize_with = "optional_text"
    )]
    pub generated_title: Option<String>,
}

/// Required text cell. Numbers and booleans are rendered as text.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "expected text, found {}",
            value_kind(&other)
        ))),
    }
}

/// Optional text cell. Blank, null and non-scalar cells are absent.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Read a numeric cell that may be a JSON number or a numeric string.
pub fn loose_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Read a whole number cell. Fractional values are rejected.
pub fn loose_integer(value: &Value) -> Option<i64> {
    let n = loose_number(value)?;
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

/// Read a non-negative count cell, flooring fractions.
pub fn loose_count(value: &Value) -> Option<u64> {
    let n = loose_number(value)?;
    if n < 0.0 {
        None
    } else {
        Some(n.floor() as u64)
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
