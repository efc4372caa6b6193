use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Response<Data, Includes> {
    pub data: Data,
    pub includes: Option<Includes>,
    pub meta: Option<Meta>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Meta {
    pub result_count: i64,
    pub newest_id: Option<String>,
    pub oldest_id: Option<String>,
    pub next_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
}

// NB: timestamps stay UTC so that archiving the same timeline twice yields
// the same bytes regardless of the host timezone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
    pub author_username: Option<String>,
    pub author_name: Option<String>,
    pub conversation_id: Option<String>,
    pub public_metrics: Option<PublicMetrics>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicMetrics {
    pub retweet_count: i32,
    pub reply_count: i32,
    pub like_count: i32,
    pub quote_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_timeline_response() {
        let body = r#"{
            "data": [
                {
                    "id": "100",
                    "text": "hello world",
                    "created_at": "2023-02-01T12:00:00.000Z",
                    "author_id": "999",
                    "conversation_id": "100",
                    "public_metrics": {
                        "retweet_count": 1,
                        "reply_count": 2,
                        "like_count": 3,
                        "quote_count": 0
                    }
                }
            ],
            "includes": {"users": [{"id": "999", "name": "Test", "username": "test"}]},
            "meta": {"result_count": 1, "newest_id": "100", "oldest_id": "100"}
        }"#;

        let resp: Response<Option<Vec<Tweet>>, serde_json::Value> =
            serde_json::from_str(body).unwrap();
        let tweets = resp.data.unwrap();
        assert_eq!(tweets.len(), 1);
        assert_eq!(tweets[0].id, "100");
        assert_eq!(tweets[0].author_id, "999");
        assert_eq!(tweets[0].author_username, None);
        assert_eq!(tweets[0].public_metrics.as_ref().unwrap().like_count, 3);
        assert_eq!(resp.meta.unwrap().result_count, 1);
    }

    #[test]
    fn deserializes_empty_timeline_without_data_key() {
        let body = r#"{"meta": {"result_count": 0}}"#;
        let resp: Response<Option<Vec<Tweet>>, serde_json::Value> =
            serde_json::from_str(body).unwrap();
        assert!(resp.data.is_none());
        assert_eq!(resp.meta.unwrap().result_count, 0);
    }

    #[test]
    fn deserializes_user_lookup_response() {
        let body = r#"{"data": {"id": "999", "name": "Test", "username": "test"}}"#;
        let resp: Response<User, ()> = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data.username, "test");
        assert!(resp.meta.is_none());
    }
}
