//! Bot-list statistics reporting.
//!
//! Posts the server count to the top.gg API when a token is configured.

use crate::error::{FerrotuneError, Result};

/// Default top.gg API endpoint.
pub const TOPGG_API_BASE: &str = "https://top.gg/api";

/// Report the bot's server count.
///
/// # Errors
///
/// Returns an error if the request fails or the API answers with a
/// non-success status code.
pub async fn post_server_count(
    client: &reqwest::Client,
    token: &str,
    bot_id: u64,
    server_count: usize,
) -> Result<()> {
    post_server_count_to(TOPGG_API_BASE, client, token, bot_id, server_count).await
}

async fn post_server_count_to(
    base: &str,
    client: &reqwest::Client,
    token: &str,
    bot_id: u64,
    server_count: usize,
) -> Result<()> {
    let url = format!("{}/bots/{}/stats", base, bot_id);
    let resp = client
        .post(&url)
        .header("Authorization", token)
        .json(&serde_json::json!({ "server_count": server_count }))
        .send()
        .await
        .map_err(|e| FerrotuneError::Network(format!("Stats request failed: {}", e)))?;

    if !resp.status().is_success() {
        return Err(FerrotuneError::Network(format!(
            "Stats API returned error: {}",
            resp.status()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_server_count() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bots/123/stats")
            .match_header("authorization", "topgg-token")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({ "server_count": 7 }),
            ))
            .with_status(200)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        post_server_count_to(&server.url(), &client, "topgg-token", 123, 7)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_server_count_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bots/123/stats")
            .with_status(401)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = post_server_count_to(&server.url(), &client, "bad-token", 123, 7).await;
        assert!(result.is_err());
    }
}
