use std::env;

use quiz_core::model::QuizVisibility;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

const PUBLIC_QUESTIONS_PATH: &str = "quiz/get_public_questions";
const PRIVATE_QUESTIONS_PATH: &str = "quiz/get_private_questions";
const STATS_PATH: &str = "quiz/update_stats";
const LENGTH_ERROR_PATH: &str = "quiz/quizlengtherror";

/// Location of the quiz server and the session used to talk to it.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    base_url: Url,
    public_questions: Url,
    private_questions: Url,
    stats: Url,
    length_error: Url,
    session_cookie: Option<String>,
}

impl ApiConfig {
    /// Build the endpoint set rooted at `base_url`.
    ///
    /// A base without a trailing slash is treated as a directory, so
    /// `https://host/app` serves `https://host/app/quiz/update_stats`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if `base_url` does not parse, or
    /// `ConfigError::NotABase` for urls such as `mailto:` that have no path.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let raw = base_url.trim();
        let mut base = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
            raw: raw.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::NotABase(raw.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| {
            base.join(path).map_err(|source| ConfigError::InvalidBaseUrl {
                raw: raw.to_string(),
                source,
            })
        };

        Ok(Self {
            public_questions: join(PUBLIC_QUESTIONS_PATH)?,
            private_questions: join(PRIVATE_QUESTIONS_PATH)?,
            stats: join(STATS_PATH)?,
            length_error: join(LENGTH_ERROR_PATH)?,
            base_url: base,
            session_cookie: None,
        })
    }

    /// Read `QUIZ_BASE_URL` and `QUIZ_SESSION_COOKIE`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `QUIZ_BASE_URL` is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("QUIZ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let cookie = env::var("QUIZ_SESSION_COOKIE")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let config = Self::new(&base_url)?;
        Ok(match cookie {
            Some(cookie) => config.with_session_cookie(cookie),
            None => config,
        })
    }

    /// Cookie header sent with every request; the question and stats routes require a login.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    /// Question endpoint for the given visibility, without query string.
    #[must_use]
    pub fn questions_url(&self, visibility: QuizVisibility) -> &Url {
        match visibility {
            QuizVisibility::Public => &self.public_questions,
            QuizVisibility::Private => &self.private_questions,
        }
    }

    #[must_use]
    pub fn stats_url(&self) -> &Url {
        &self.stats
    }

    /// Page shown when a quiz cannot be played.
    #[must_use]
    pub fn length_error_url(&self) -> &Url {
        &self.length_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hang_off_the_base_path() {
        let config = ApiConfig::new("https://quiz.example/app").unwrap();

        assert_eq!(config.base_url().as_str(), "https://quiz.example/app/");
        assert_eq!(
            config.questions_url(QuizVisibility::Public).as_str(),
            "https://quiz.example/app/quiz/get_public_questions"
        );
        assert_eq!(
            config.questions_url(QuizVisibility::Private).as_str(),
            "https://quiz.example/app/quiz/get_private_questions"
        );
        assert_eq!(
            config.stats_url().as_str(),
            "https://quiz.example/app/quiz/update_stats"
        );
        assert_eq!(
            config.length_error_url().as_str(),
            "https://quiz.example/app/quiz/quizlengtherror"
        );
    }

    #[test]
    fn default_base_is_local_server() {
        let config = ApiConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            config.stats_url().as_str(),
            "http://127.0.0.1:5000/quiz/update_stats"
        );
        assert!(config.session_cookie().is_none());
    }

    #[test]
    fn rejects_garbage_and_non_base_urls() {
        assert!(matches!(
            ApiConfig::new("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ApiConfig::new("mailto:quiz@example.com"),
            Err(ConfigError::NotABase(_))
        ));
    }
}
