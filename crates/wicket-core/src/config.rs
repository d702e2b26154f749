use thiserror::Error;

pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Process-wide settings, read once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: u16,
    pub jira_base_url: String,
    /// Path prefix under the base URL, e.g. `/rest/api/latest/`.
    pub jira_api_path: String,
    pub jira_auth_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("SERVER_PORT {0:?} is not a valid port number")]
    InvalidPort(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but with the variable source injected,
    /// so tests do not have to mutate process-global state.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let required = |key: &'static str| match lookup(key) {
            Some(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
            _ => Err(ConfigError::Missing(key)),
        };

        let server_port = match lookup("SERVER_PORT") {
            Some(v) if !v.trim().is_empty() => v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(v))?,
            _ => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            server_port,
            jira_base_url: required("JIRA_BASE_URL")?,
            jira_api_path: required("JIRA_API_URL")?,
            jira_auth_token: required("JIRA_API_TOKEN")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + '_ {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn loads_complete_environment() {
        let cfg = Config::from_lookup(vars(&[
            ("SERVER_PORT", "9090"),
            ("JIRA_BASE_URL", "https://jira.example.com"),
            ("JIRA_API_URL", "/rest/api/latest/"),
            ("JIRA_API_TOKEN", "dummy-token"),
        ]))
        .unwrap();

        assert_eq!(cfg.server_port, 9090);
        assert_eq!(cfg.jira_base_url, "https://jira.example.com");
        assert_eq!(cfg.jira_api_path, "/rest/api/latest/");
        assert_eq!(cfg.jira_auth_token, "dummy-token");
    }

    #[test]
    fn port_defaults_when_unset_or_blank() {
        let base = [
            ("JIRA_BASE_URL", "https://jira.example.com"),
            ("JIRA_API_URL", "/rest/api/latest/"),
            ("JIRA_API_TOKEN", "dummy-token"),
        ];
        let cfg = Config::from_lookup(vars(&base)).unwrap();
        assert_eq!(cfg.server_port, DEFAULT_SERVER_PORT);

        let mut with_blank = base.to_vec();
        with_blank.push(("SERVER_PORT", "  "));
        let cfg = Config::from_lookup(vars(&with_blank)).unwrap();
        assert_eq!(cfg.server_port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn rejects_unparsable_port() {
        let err = Config::from_lookup(vars(&[
            ("SERVER_PORT", "eighty"),
            ("JIRA_BASE_URL", "https://jira.example.com"),
            ("JIRA_API_URL", "/rest/api/latest/"),
            ("JIRA_API_TOKEN", "dummy-token"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("eighty".to_owned()));
    }

    #[test]
    fn missing_or_blank_required_vars_fail() {
        let err = Config::from_lookup(vars(&[
            ("JIRA_BASE_URL", "https://jira.example.com"),
            ("JIRA_API_URL", "/rest/api/latest/"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JIRA_API_TOKEN"));

        let err = Config::from_lookup(vars(&[
            ("JIRA_BASE_URL", "   "),
            ("JIRA_API_URL", "/rest/api/latest/"),
            ("JIRA_API_TOKEN", "dummy-token"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JIRA_BASE_URL"));
    }

    #[test]
    fn trims_required_values() {
        let cfg = Config::from_lookup(vars(&[
            ("JIRA_BASE_URL", " https://jira.example.com "),
            ("JIRA_API_URL", "/rest/api/latest/"),
            ("JIRA_API_TOKEN", "dummy-token"),
        ]))
        .unwrap();
        assert_eq!(cfg.jira_base_url, "https://jira.example.com");
    }
}
