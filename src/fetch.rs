use std::time::Instant;

use crate::archive::{normalize_prompts, normalize_submissions, Prompt, Submission};
use crate::error::ArchiveError;
use crate::scoring::{compute_leaderboard, LeaderboardEntry};
use crate::source::ArchiveClient;

/// Everything the browse commands need, normalized
#[derive(Debug, Clone)]
pub struct Archive {
    pub prompts: Vec<Prompt>,
    pub submissions: Vec<Submission>,
}

pub async fn fetch_prompts(client: &ArchiveClient) -> Result<Vec<Prompt>, ArchiveError> {
    let raw = client.list_prompts().await?;
    normalize_prompts(raw)
}

pub async fn fetch_submissions(client: &ArchiveClient) -> Result<Vec<Submission>, ArchiveError> {
    let raw = client.list_submissions().await?;
    normalize_submissions(raw)
}

/// Fetch prompts and submissions concurrently. Either failure fails both.
pub async fn fetch_archive(client: &ArchiveClient) -> Result<Archive, ArchiveError> {
    let (prompts, submissions) =
        futures::try_join!(fetch_prompts(client), fetch_submissions(client))?;
    tracing::debug!(
        prompts = prompts.len(),
        submissions = submissions.len(),
        "archive loaded"
    );
    Ok(Archive {
        prompts,
        submissions,
    })
}

/// Fetch submissions, normalize, filter and rank.
///
/// Any upstream failure is returned as-is; callers must not fall back to a
/// partial or previously computed board.
pub async fn fetch_leaderboard(client: &ArchiveClient) -> Result<Vec<LeaderboardEntry>, ArchiveError> {
    let started = Instant::now();
    let submissions = fetch_submissions(client).await?;
    let leaderboard = compute_leaderboard(&submissions);
    tracing::debug!(
        submissions = submissions.len(),
        contributors = leaderboard.len(),
        elapsed = ?started.elapsed(),
        "leaderboard computed"
    );
    Ok(leaderboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::source::SourceSettings;
    use httpmock::{Method::GET, MockServer};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn client_for(url: Option<String>) -> ArchiveClient {
        let _ = rustls::crypto::ring::default_provider().install_default();
        ArchiveClient::new(SourceSettings {
            data_url: url,
            timeout: Duration::from_secs(5),
            retries: 0,
        })
        .unwrap()
    }

    fn submission_row(id: &str, author: &str, valid: &str, rank: Value, upvotes: Value) -> Value {
        json!({
            "Submission_ID (auto)": id,
            "Prompt_ID (choose)": "2024-W05-FIC",
            "Author_Username": author,
            "Submission_Title": format!("Entry {}", id),
            "Reddit_Post_URL": format!("https://reddit.com/r/redrising/{}", id),
            "Votes_Valid": valid,
            "Winner_Rank": rank,
            "Upvotes": upvotes
        })
    }

    fn prompt_row() -> Value {
        json!({
            "Prompt_ID (auto)": "2024-W05-FIC",
            "Week (ISO)": 5,
            "Type": "FANFIC",
            "Title": "Storms over Mars",
            "Start_Date (Oslo)": "2024-01-29",
            "End_Date (Oslo)": "2024-02-04",
            "ISO_Year": 2024,
            "Status": "CLOSED",
            "Reddit_Post_URL": "https://reddit.com/r/redrising/abc"
        })
    }

    async fn serve(server: &MockServer, action: &str, data: Value) {
        let action = action.to_string();
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/exec").query_param("action", action.as_str());
                then.status(200).json_body(json!({ "data": data }));
            })
            .await;
    }

    #[tokio::test]
    async fn test_fetch_leaderboard_end_to_end() {
        let server = MockServer::start_async().await;
        serve(
            &server,
            "submissions",
            json!([
                submission_row("1", "darrow", "YES", json!(1), json!(0)),
                submission_row("2", "cassius", "yes", json!(""), json!(130)),
                submission_row("3", "darrow", "YES", json!(2), json!("")),
                submission_row("4", "roque", "NO", json!(1), json!(1000)),
                submission_row("5", "cassius", "YES", json!(7), json!(1000))
            ]),
        )
        .await;

        let client = client_for(Some(server.url("/exec")));
        let board = fetch_leaderboard(&client).await.unwrap();

        let pairs: Vec<(&str, u64)> = board.iter().map(|e| (e.username.as_str(), e.points)).collect();
        // darrow: (5+15) + (5+8); cassius: (5+5) + (5+10), rank 7 ignored
        assert_eq!(pairs, vec![("darrow", 33), ("cassius", 25)]);
    }

    #[tokio::test]
    async fn test_fetch_leaderboard_malformed_fails_whole_batch() {
        let server = MockServer::start_async().await;
        serve(
            &server,
            "submissions",
            json!([
                submission_row("1", "darrow", "YES", json!(1), json!(0)),
                { "Submission_ID (auto)": "2", "Votes_Valid": "YES" }
            ]),
        )
        .await;

        let client = client_for(Some(server.url("/exec")));
        let err = fetch_leaderboard(&client).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::MalformedRecord);
    }

    #[tokio::test]
    async fn test_fetch_leaderboard_not_configured() {
        let client = client_for(None);
        let err = fetch_leaderboard(&client).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[tokio::test]
    async fn test_fetch_archive_loads_both_collections() {
        let server = MockServer::start_async().await;
        serve(&server, "prompts", json!([prompt_row()])).await;
        serve(
            &server,
            "submissions",
            json!([submission_row("1", "darrow", "YES", json!(null), json!(3))]),
        )
        .await;

        let client = client_for(Some(server.url("/exec")));
        let archive = fetch_archive(&client).await.unwrap();
        assert_eq!(archive.prompts.len(), 1);
        assert_eq!(archive.prompts[0].id, "2024-W05-FIC");
        assert_eq!(archive.submissions.len(), 1);
        assert_eq!(archive.submissions[0].upvotes, Some(3));
    }

    #[tokio::test]
    async fn test_fetch_archive_fails_when_one_side_fails() {
        let server = MockServer::start_async().await;
        serve(&server, "prompts", json!([prompt_row()])).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/exec").query_param("action", "submissions");
                then.status(500);
            })
            .await;

        let client = client_for(Some(server.url("/exec")));
        let err = fetch_archive(&client).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Transport);
    }
}
