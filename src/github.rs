use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::stats::StatsRecord;

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

const USER_AGENT: &str = concat!("gh-stats-card/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_STATS_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    repositories(first: 100, ownerAffiliations: OWNER) {
      nodes {
        stargazerCount
      }
    }
    repositoriesContributedTo {
      totalCount
    }
    contributionsCollection {
      totalCommitContributions
      totalPullRequestContributions
      totalIssueContributions
      contributionCalendar {
        totalContributions
      }
    }
    pullRequests {
      totalCount
    }
    issues {
      totalCount
    }
  }
}
"#;

#[derive(Deserialize)]
struct CountObj {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Deserialize)]
struct UserStatsResponse {
    data: Option<UserStatsData>,
}

#[derive(Deserialize)]
struct UserStatsData {
    user: Option<UserNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    repositories: StarRepos,
    repositories_contributed_to: CountObj,
    contributions_collection: ContribCollection,
    pull_requests: CountObj,
    issues: CountObj,
}

#[derive(Deserialize)]
struct StarRepos {
    nodes: Option<Vec<Option<StarNode>>>,
}

#[derive(Deserialize)]
struct StarNode {
    #[serde(rename = "stargazerCount")]
    stargazer_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContribCollection {
    total_commit_contributions: u64,
    total_pull_request_contributions: u64,
    total_issue_contributions: u64,
    contribution_calendar: ContribCalendar,
}

#[derive(Deserialize)]
struct ContribCalendar {
    #[serde(rename = "totalContributions")]
    total_contributions: u64,
}

/// Reads the API token from [`TOKEN_ENV`]. Blank values count as missing.
pub fn token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub struct GithubClient {
    token: String,
    endpoint: String,
    http: Client,
}

impl GithubClient {
    /// Create a GitHub GraphQL client for the public API endpoint.
    pub fn new(token: impl Into<String>) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            token: token.into(),
            endpoint: GITHUB_GRAPHQL_URL.to_string(),
            http,
        })
    }

    /// Point the client at another GraphQL endpoint (GitHub Enterprise).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// One GraphQL POST. Non-2xx responses become [`FetchError::Http`].
    async fn graphql(&self, query: &str, variables: Value) -> Result<Value, FetchError> {
        debug!(endpoint = %self.endpoint, "sending GraphQL request");

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "GraphQL response received");

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch every counter on the card with a single request.
    pub async fn user_stats(&self, login: &str) -> Result<StatsRecord, FetchError> {
        let json = self
            .graphql(USER_STATS_QUERY, serde_json::json!({ "login": login }))
            .await?;
        decode_user_stats(login, json)
    }
}

/// Turn a raw GraphQL response body into a [`StatsRecord`].
///
/// Stars are summed over the owned repositories the query returned; a
/// missing or empty node list counts as zero.
pub fn decode_user_stats(login: &str, json: Value) -> Result<StatsRecord, FetchError> {
    if let Some(errors) = json.get("errors").filter(|e| !e.is_null()) {
        return Err(FetchError::GraphQl(format!("{errors:#}")));
    }

    let parsed: UserStatsResponse = serde_json::from_value(json)?;
    let user = parsed
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| FetchError::UserNotFound(login.to_string()))?;

    let total_stars = user
        .repositories
        .nodes
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .fold(0u64, |acc, n| acc.saturating_add(n.stargazer_count));

    let contrib = user.contributions_collection;
    Ok(StatsRecord {
        total_stars,
        total_commits: contrib.total_commit_contributions,
        total_prs: user.pull_requests.total_count,
        total_issues: user.issues.total_count,
        contributed_to: user.repositories_contributed_to.total_count,
        year_contributions: contrib.contribution_calendar.total_contributions,
        pr_contributions: contrib.total_pull_request_contributions,
        issue_contributions: contrib.total_issue_contributions,
    })
}
