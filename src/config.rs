use std::env;

fn env_or_empty(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

/// The full credential set for the platform, read from the environment once
/// at startup. Every field is optional; an unset variable becomes the empty
/// string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub email: String,
    pub api_key: String,
    pub api_secret_key: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            username: env_or_empty("TWITTER_USERNAME"),
            password: env_or_empty("TWITTER_PASSWORD"),
            email: env_or_empty("TWITTER_EMAIL"),
            api_key: env_or_empty("TWITTER_API_KEY"),
            api_secret_key: env_or_empty("TWITTER_API_SECRET_KEY"),
            access_token: env_or_empty("TWITTER_ACCESS_TOKEN"),
            access_token_secret: env_or_empty("TWITTER_ACCESS_TOKEN_SECRET"),
        }
    }

    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    pub fn has_api_key_pair(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "TWITTER_USERNAME",
        "TWITTER_PASSWORD",
        "TWITTER_EMAIL",
        "TWITTER_API_KEY",
        "TWITTER_API_SECRET_KEY",
        "TWITTER_ACCESS_TOKEN",
        "TWITTER_ACCESS_TOKEN_SECRET",
    ];

    fn clear_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn missing_vars_default_to_empty() {
        clear_vars();
        let credentials = Credentials::from_env();
        assert_eq!(credentials, Credentials::default());
        assert!(!credentials.has_access_token());
        assert!(!credentials.has_api_key_pair());
    }

    #[test]
    #[serial]
    fn reads_all_seven_vars() {
        clear_vars();
        for var in VARS {
            env::set_var(var, format!("value-of-{var}"));
        }
        let credentials = Credentials::from_env();
        clear_vars();

        assert_eq!(credentials.username, "value-of-TWITTER_USERNAME");
        assert_eq!(credentials.password, "value-of-TWITTER_PASSWORD");
        assert_eq!(credentials.email, "value-of-TWITTER_EMAIL");
        assert_eq!(credentials.api_key, "value-of-TWITTER_API_KEY");
        assert_eq!(
            credentials.api_secret_key,
            "value-of-TWITTER_API_SECRET_KEY"
        );
        assert_eq!(credentials.access_token, "value-of-TWITTER_ACCESS_TOKEN");
        assert_eq!(
            credentials.access_token_secret,
            "value-of-TWITTER_ACCESS_TOKEN_SECRET"
        );
    }

    #[test]
    fn api_key_pair_requires_both_halves() {
        let credentials = Credentials {
            api_key: "key".to_string(),
            ..Credentials::default()
        };
        assert!(!credentials.has_api_key_pair());

        let credentials = Credentials {
            api_key: "key".to_string(),
            api_secret_key: "secret".to_string(),
            ..Credentials::default()
        };
        assert!(credentials.has_api_key_pair());
    }
}
