use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptType {
    Fanfic,
    FanArt,
}

impl PromptType {
    /// Parse the sheet's type column ("FANFIC", "FAN ART", "FAN_ART", ...)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "FANFIC" => Some(PromptType::Fanfic),
            "FANART" => Some(PromptType::FanArt),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PromptType::Fanfic => "Fanfiction",
            PromptType::FanArt => "Fan Art",
        }
    }

    /// Short code used in generated prompt ids
    pub fn code(&self) -> &'static str {
        match self {
            PromptType::Fanfic => "FIC",
            PromptType::FanArt => "ART",
        }
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptType::Fanfic => f.write_str("FANFIC"),
            PromptType::FanArt => f.write_str("FAN_ART"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptStatus {
    Upcoming,
    Active,
    Closed,
}

impl PromptStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UPCOMING" => Some(PromptStatus::Upcoming),
            "ACTIVE" => Some(PromptStatus::Active),
            "CLOSED" => Some(PromptStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for PromptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptStatus::Upcoming => f.write_str("UPCOMING"),
            PromptStatus::Active => f.write_str("ACTIVE"),
            PromptStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

/// Placement awarded to a submission. Only 1st to 3rd exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum WinnerRank {
    First,
    Second,
    Third,
}

impl WinnerRank {
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(WinnerRank::First),
            2 => Some(WinnerRank::Second),
            3 => Some(WinnerRank::Third),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            WinnerRank::First => 1,
            WinnerRank::Second => 2,
            WinnerRank::Third => 3,
        }
    }
}

impl From<WinnerRank> for u8 {
    fn from(rank: WinnerRank) -> Self {
        rank.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpoilerFlag {
    Yes,
    No,
}

/// A weekly creative challenge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt {
    pub id: String,
    pub kind: PromptType,
    pub week: u8,
    pub iso_year: i32,
    pub title: String,
    pub theme: Option<String>,
    pub thread_url: String,
    pub opens_at: String,
    pub closes_at: String,
    pub status: PromptStatus,
    pub winners: Option<String>,
    pub notes: Option<String>,
    pub thread_title: Option<String>,
    pub total_submissions: Option<u64>,
    pub total_votes: Option<u64>,
}

impl Prompt {
    /// Winner usernames as listed in the sheet (comma or newline separated)
    pub fn winner_names(&self) -> Vec<&str> {
        self.winners
            .as_deref()
            .map(|w| {
                w.split([',', '\n'])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One community entry responding to a prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: String,
    pub prompt_id: String,
    pub author: String,
    pub title: String,
    pub post_url: String,
    pub kind: Option<PromptType>,
    pub week: Option<u8>,
    pub iso_year: Option<i32>,
    pub upvotes: Option<u64>,
    pub comments: Option<u64>,
    pub winner_rank: Option<WinnerRank>,
    pub spoilers: Option<SpoilerFlag>,
    pub created_at: Option<String>,
    pub validity: Option<String>,
    pub generated_title: Option<String>,
}

impl Submission {
    pub fn has_spoilers(&self) -> bool {
        self.spoilers == Some(SpoilerFlag::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_type_accepts_sheet_spellings() {
        assert_eq!(PromptType::parse("FANFIC"), Some(PromptType::Fanfic));
        assert_eq!(PromptType::parse("FAN ART"), Some(PromptType::FanArt));
        assert_eq!(PromptType::parse("fan_art"), Some(PromptType::FanArt));
        assert_eq!(PromptType::parse(" Fan-Art "), Some(PromptType::FanArt));
        assert_eq!(PromptType::parse("poetry"), None);
    }

    #[test]
    fn test_prompt_status_case_insensitive() {
        assert_eq!(PromptStatus::parse("active"), Some(PromptStatus::Active));
        assert_eq!(PromptStatus::parse("CLOSED"), Some(PromptStatus::Closed));
        assert_eq!(PromptStatus::parse("done"), None);
    }

    #[test]
    fn test_winner_rank_only_podium() {
        assert_eq!(WinnerRank::from_number(1), Some(WinnerRank::First));
        assert_eq!(WinnerRank::from_number(3), Some(WinnerRank::Third));
        assert_eq!(WinnerRank::from_number(0), None);
        assert_eq!(WinnerRank::from_number(4), None);
        assert_eq!(WinnerRank::from_number(-1), None);
    }

    #[test]
    fn test_winner_rank_serializes_as_number() {
        let json = serde_json::to_string(&WinnerRank::Second).unwrap();
        assert_eq!(json, "2");
    }

    #[test]
    fn test_winner_names_split() {
        let prompt = Prompt {
            id: "2024-W05-FIC".to_string(),
            kind: PromptType::Fanfic,
            week: 5,
            iso_year: 2024,
            title: "Storms".to_string(),
            theme: None,
            thread_url: "https://reddit.com/r/x/1".to_string(),
            opens_at: "2024-01-29".to_string(),
            closes_at: "2024-02-04".to_string(),
            status: PromptStatus::Closed,
            winners: Some("alice, bob\ncarol,".to_string()),
            notes: None,
            thread_title: None,
            total_submissions: None,
            total_votes: None,
        };
        assert_eq!(prompt.winner_names(), vec!["alice", "bob", "carol"]);
    }
}
