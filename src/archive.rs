use crate::config::Credentials;
use crate::twitter_client::api;
use crate::twitter_client::TweetSource;
use anyhow::{Context, Result};
use log::{error, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const OUTPUT_FILE_NAME: &str = "tweets.json";
pub const FETCH_FALLBACK_MESSAGE: &str = "fetch failed; using dummy data";

#[derive(Clone, Debug)]
pub struct ArchiveRequest {
    pub account: String,
    pub count: usize,
    pub output_dir: PathBuf,
}

impl ArchiveRequest {
    pub fn output_file(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE_NAME)
    }
}

/// What lands in the output file: the fetched tweets as a bare array, or the
/// fixed fallback object when the fetch failed. The sink always gets one of
/// the two; there is no "nothing to write" case.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum ArchivePayload {
    Tweets(Vec<api::Tweet>),
    Fallback {
        message: String,
        posts: Vec<api::Tweet>,
    },
}

impl ArchivePayload {
    pub fn fetch_fallback() -> Self {
        Self::Fallback {
            message: FETCH_FALLBACK_MESSAGE.to_string(),
            posts: Vec::new(),
        }
    }
}

/// One archive run: ensure a session, fetch, persist. Login failures
/// propagate; fetch failures degrade to the fallback payload; persistence
/// failures are logged and swallowed.
pub async fn run<S>(
    source: &mut S,
    credentials: &Credentials,
    request: &ArchiveRequest,
) -> Result<()>
where
    S: TweetSource,
{
    if source.is_authenticated().await {
        info!("Already logged in");
    } else {
        info!("Not logged in. Logging in with configured credentials...");
        source.login(credentials).await?;
        // NB: no re-probe after login; a bad session surfaces as a fetch error.
    }

    let payload = match source.latest_tweets(&request.account, request.count).await {
        Ok(tweets) => {
            info!("Fetched {} tweets for @{}", tweets.len(), request.account);
            ArchivePayload::Tweets(tweets)
        }
        Err(err) => {
            error!("Error fetching tweets for @{}: {err:#}", request.account);
            ArchivePayload::fetch_fallback()
        }
    };

    let path = request.output_file();
    match persist_json(&path, &payload) {
        Ok(()) => info!("Saved tweets to {}", path.display()),
        Err(err) => error!("Error saving tweets to {}: {err:#}", path.display()),
    }

    Ok(())
}

/// Serialize to two-space-indented JSON and overwrite `path`, creating any
/// missing parent directories first.
pub fn persist_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("Could not write {}", path.display()))?;
    Ok(())
}
