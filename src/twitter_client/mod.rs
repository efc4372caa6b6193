pub mod api;

use crate::config::Credentials;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request};
use hyper_tls::HttpsConnector;
use log::warn;
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{AccessToken, AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use url::Url;

const SESSION_CACHE_PATH: &str = "./var/.session";

/// The platform boundary: one session probe, one login, one fetch. The
/// archive routine only ever talks to this trait, so the concrete client can
/// be swapped out in tests.
#[async_trait]
pub trait TweetSource {
    /// Side-effect-free. Transport failures read as "not authenticated".
    async fn is_authenticated(&self) -> bool;

    /// Establishes a session from the configured credential set. No retry;
    /// failures propagate to the caller.
    async fn login(&mut self, credentials: &Credentials) -> Result<()>;

    /// Latest `count` tweets for `account`, newest-first as far as the
    /// platform guarantees it. Single page, no pagination.
    async fn latest_tweets(&self, account: &str, count: usize) -> Result<Vec<api::Tweet>>;
}

#[derive(Debug, Clone)]
pub struct TwitterClient {
    https_client: Client<HttpsConnector<HttpConnector>>,
    access_token: Option<AccessToken>,
    session_path: PathBuf,
}

impl TwitterClient {
    pub fn new() -> Self {
        Self::with_session_path(SESSION_CACHE_PATH)
    }

    pub fn with_session_path(session_path: impl Into<PathBuf>) -> Self {
        let https = HttpsConnector::new();
        let https_client = Client::builder().build::<_, hyper::Body>(https);
        Self {
            https_client,
            access_token: None,
            session_path: session_path.into(),
        }
    }

    pub fn load_session(&mut self) -> Result<()> {
        let access_token = fs::read_to_string(&self.session_path)?;
        let access_token = serde_json::from_str(&access_token)?;
        self.access_token = Some(access_token);
        Ok(())
    }

    pub fn save_session(&self) -> Result<()> {
        let access_token = self
            .access_token
            .as_ref()
            .ok_or(anyhow!("No session to save"))?;
        let access_token = serde_json::to_string(&access_token)?;
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.session_path, access_token)?;
        Ok(())
    }

    fn bearer(&self) -> Result<&AccessToken> {
        self.access_token.as_ref().ok_or(anyhow!("Unauthorized"))
    }

    pub async fn me(&self) -> Result<api::User> {
        let access_token = self.bearer()?;
        let req = Request::builder()
            .method(Method::GET)
            .uri("https://api.twitter.com/2/users/me")
            .header("Authorization", format!("Bearer {}", access_token.secret()))
            .body(Body::empty())?;

        let resp = self.https_client.request(req).await?;
        let resp = hyper::body::to_bytes(resp.into_body()).await?;
        let resp: api::Response<api::User, ()> = serde_json::from_slice(&resp)?;
        Ok(resp.data)
    }

    pub async fn user_by_username(&self, username: &str) -> Result<api::User> {
        let access_token = self.bearer()?;
        let req = Request::builder()
            .method(Method::GET)
            .uri(format!(
                "https://api.twitter.com/2/users/by/username/{username}"
            ))
            .header("Authorization", format!("Bearer {}", access_token.secret()))
            .body(Body::empty())?;

        let resp = self.https_client.request(req).await?;
        let resp = hyper::body::to_bytes(resp.into_body()).await?;
        let resp: api::Response<api::User, ()> = serde_json::from_slice(&resp)
            .with_context(|| format!("Could not resolve user @{username}"))?;
        Ok(resp.data)
    }
}

impl Default for TwitterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TweetSource for TwitterClient {
    async fn is_authenticated(&self) -> bool {
        if self.access_token.is_none() {
            return false;
        }
        self.me().await.is_ok()
    }

    async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        if credentials.has_access_token() {
            // Pre-issued token from the developer console; adopt as-is.
            self.access_token = Some(AccessToken::new(credentials.access_token.clone()));
        } else if credentials.has_api_key_pair() {
            let oauth_client = BasicClient::new(
                ClientId::new(credentials.api_key.clone()),
                Some(ClientSecret::new(credentials.api_secret_key.clone())),
                AuthUrl::new("https://twitter.com/i/oauth2/authorize".to_string())?,
                Some(TokenUrl::new(
                    "https://api.twitter.com/oauth2/token".to_string(),
                )?),
            );
            let token_result = oauth_client
                .exchange_client_credentials()
                .request_async(async_http_client)
                .await?;
            self.access_token = Some(token_result.access_token().clone());
        } else {
            return Err(anyhow!(
                "No usable credentials: set TWITTER_ACCESS_TOKEN or the \
                 TWITTER_API_KEY/TWITTER_API_SECRET_KEY pair (a username/password \
                 alone cannot establish an API session)"
            ));
        }

        if let Err(err) = self.save_session() {
            warn!(
                "Could not cache session to {}: {err:#}",
                self.session_path.display()
            );
        }
        Ok(())
    }

    async fn latest_tweets(&self, account: &str, count: usize) -> Result<Vec<api::Tweet>> {
        let access_token = self.bearer()?;
        let user = self.user_by_username(account).await?;

        let mut uri = Url::parse(&format!(
            "https://api.twitter.com/2/users/{}/tweets",
            user.id
        ))?;
        uri.query_pairs_mut()
            .append_pair("max_results", &count.to_string())
            .append_pair(
                "tweet.fields",
                "created_at,public_metrics,conversation_id",
            )
            .append_pair("user.fields", "username")
            .append_pair("expansions", "author_id");

        let req = Request::builder()
            .method(Method::GET)
            .uri(uri.to_string())
            .header("Authorization", format!("Bearer {}", access_token.secret()))
            .body(Body::empty())?;

        #[derive(Debug, Serialize, Deserialize)]
        struct Includes {
            users: Vec<api::User>,
        }

        let resp = self.https_client.request(req).await?;
        let resp = hyper::body::to_bytes(resp.into_body()).await?;
        let resp: api::Response<Option<Vec<api::Tweet>>, Includes> = serde_json::from_slice(&resp)
            .with_context(|| format!("Unexpected timeline response for @{account}"))?;

        // NB: `data` is omitted entirely for an account with no tweets.
        let data = resp.data.unwrap_or_default();

        let users: HashMap<String, &api::User> = match &resp.includes {
            Some(includes) => includes
                .users
                .iter()
                .map(|user| (user.id.clone(), user))
                .collect(),
            None => HashMap::new(),
        };

        let tweets = data
            .iter()
            .map(|tweet| api::Tweet {
                author_username: users
                    .get(&tweet.author_id)
                    .map(|user| user.username.clone()),
                author_name: users.get(&tweet.author_id).map(|user| user.name.clone()),
                ..tweet.clone()
            })
            .collect();

        Ok(tweets)
    }
}
