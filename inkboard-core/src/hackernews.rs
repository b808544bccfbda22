//! Hacker News top stories.

use serde::{Deserialize, Serialize};

use crate::error::InkboardResult;

const TOP_STORIES_URL: &str = "https://hacker-news.firebaseio.com/v0/topstories.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub score: u32,
    pub by: String,
    pub url: Option<String>,
}

/// Top `limit` stories in rank order. Any failure yields an empty list;
/// the dashboard simply shows no stories.
pub async fn fetch_top_stories(client: &reqwest::Client, limit: usize) -> Vec<Story> {
    match try_fetch_top_stories(client, limit).await {
        Ok(stories) => stories,
        Err(err) => {
            eprintln!("HN API error: {err}");
            Vec::new()
        }
    }
}

async fn try_fetch_top_stories(
    client: &reqwest::Client,
    limit: usize,
) -> InkboardResult<Vec<Story>> {
    let ids: Vec<u64> = client
        .get(TOP_STORIES_URL)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    // Fetch details concurrently, then collect in rank order.
    let handles: Vec<_> = ids
        .into_iter()
        .take(limit)
        .map(|id| {
            let client = client.clone();
            tokio::spawn(async move { fetch_story(&client, id).await })
        })
        .collect();

    let mut stories = Vec::with_capacity(limit);
    for handle in handles {
        let story = handle
            .await
            .map_err(|e| crate::error::InkboardError::Fetch(e.to_string()))??;
        stories.push(story);
    }
    Ok(stories)
}

async fn fetch_story(client: &reqwest::Client, id: u64) -> InkboardResult<Story> {
    let url = format!("https://hacker-news.firebaseio.com/v0/item/{id}.json");
    let story = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(story)
}
