use crate::domain::ports::{CandidateSource, ConfigProvider};
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.sdkman.io/2";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint<'a> {
    CandidateList,
    CandidateNames,
    DefaultVersion(&'a str),
    CandidateVersions {
        candidate: &'a str,
        current: Option<&'a str>,
        installed: &'a [String],
    },
}

/// HTTP client for the SDKMAN candidates API.
#[derive(Debug, Clone)]
pub struct SdkmanApi {
    client: Client,
    base_url: Url,
    platform: String,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl SdkmanApi {
    pub fn new(base_url: &str, platform: &str) -> Result<Self> {
        Self::with_options(base_url, platform, Duration::from_secs(10), 2, Duration::from_millis(500))
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_options(
            config.api_base_url(),
            config.platform(),
            Duration::from_secs(config.timeout_seconds()),
            config.retry_attempts(),
            Duration::from_millis(config.retry_delay_millis()),
        )
    }

    pub fn with_options(
        base_url: &str,
        platform: &str,
        timeout: Duration,
        retry_attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base for API paths".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sdk-catalog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            platform: platform.to_string(),
            retry_attempts,
            retry_delay,
        })
    }

    fn endpoint_url(&self, endpoint: &Endpoint<'_>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| CatalogError::ConfigError {
                message: format!("cannot append API paths to {}", self.base_url),
            })?;
            segments.pop_if_empty().push("candidates");
            match endpoint {
                Endpoint::CandidateList => {
                    segments.push("list");
                }
                Endpoint::CandidateNames => {
                    segments.push("all");
                }
                Endpoint::DefaultVersion(candidate) => {
                    segments.extend(["default", *candidate]);
                }
                Endpoint::CandidateVersions { candidate, .. } => {
                    segments.extend([*candidate, self.platform.as_str(), "versions", "list"]);
                }
            }
        }

        if let Endpoint::CandidateVersions {
            current, installed, ..
        } = endpoint
        {
            url.query_pairs_mut()
                .append_pair("current", current.unwrap_or_default())
                .append_pair("installed", &installed.join(","));
        }

        Ok(url)
    }

    async fn get_text(&self, endpoint: Endpoint<'_>) -> Result<String> {
        let url = self.endpoint_url(&endpoint)?;
        let mut attempt = 0;

        loop {
            match self.try_get(&url).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    attempt += 1;
                    let delay = self.retry_delay * attempt;
                    tracing::warn!(
                        "Request to {} failed ({}), retry {}/{} in {:?}",
                        url,
                        e,
                        attempt,
                        self.retry_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get(&self, url: &Url) -> Result<String> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(CatalogError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl CandidateSource for SdkmanApi {
    async fn candidate_list(&self) -> Result<String> {
        self.get_text(Endpoint::CandidateList).await
    }

    async fn candidate_versions(
        &self,
        candidate: &str,
        current: Option<&str>,
        installed: &[String],
    ) -> Result<String> {
        self.get_text(Endpoint::CandidateVersions {
            candidate,
            current,
            installed,
        })
        .await
    }

    async fn default_version(&self, candidate: &str) -> Result<String> {
        let body = self.get_text(Endpoint::DefaultVersion(candidate)).await?;
        Ok(body.trim().to_string())
    }

    async fn candidate_names(&self) -> Result<Vec<String>> {
        let body = self.get_text(Endpoint::CandidateNames).await?;
        Ok(body
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn api(server: &MockServer) -> SdkmanApi {
        SdkmanApi::with_options(
            &server.url("/2"),
            "linuxx64",
            Duration::from_secs(5),
            2,
            Duration::from_millis(10),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let api = SdkmanApi::new("https://api.sdkman.io/2/", "darwinarm64").unwrap();
        let installed = vec!["8.0.2".to_string(), "7.6".to_string()];

        assert_eq!(
            api.endpoint_url(&Endpoint::CandidateList).unwrap().as_str(),
            "https://api.sdkman.io/2/candidates/list"
        );
        assert_eq!(
            api.endpoint_url(&Endpoint::DefaultVersion("java")).unwrap().as_str(),
            "https://api.sdkman.io/2/candidates/default/java"
        );
        assert_eq!(
            api.endpoint_url(&Endpoint::CandidateVersions {
                candidate: "gradle",
                current: Some("8.0.2"),
                installed: &installed,
            })
            .unwrap()
            .as_str(),
            "https://api.sdkman.io/2/candidates/gradle/darwinarm64/versions/list?current=8.0.2&installed=8.0.2%2C7.6"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(SdkmanApi::new("not a url", "linuxx64").is_err());
        assert!(SdkmanApi::new("mailto:me@example.com", "linuxx64").is_err());
    }

    #[tokio::test]
    async fn test_candidate_names_are_split_and_trimmed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/2/candidates/all");
            then.status(200).body("activemq, ant,gradle,\n");
        });

        let names = api(&server).candidate_names().await.unwrap();

        mock.assert();
        assert_eq!(names, vec!["activemq", "ant", "gradle"]);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/2/candidates/default/nope");
            then.status(404);
        });

        let err = api(&server).default_version("nope").await.unwrap_err();

        mock.assert_hits(1);
        assert!(matches!(err, CatalogError::ServerError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_reported() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/2/candidates/list");
            then.status(503);
        });

        let err = api(&server).candidate_list().await.unwrap_err();

        mock.assert_hits(3);
        assert!(matches!(err, CatalogError::ServerError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_retried_then_reported() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/2/candidates/list");
            then.status(200)
                .body("too late")
                .delay(Duration::from_millis(1500));
        });
        let api = SdkmanApi::with_options(
            &server.url("/2"),
            "linuxx64",
            Duration::from_millis(200),
            1,
            Duration::from_millis(10),
        )
        .unwrap();

        let err = api.candidate_list().await.unwrap_err();

        mock.assert_hits(2);
        assert!(matches!(err, CatalogError::ApiError(ref e) if e.is_timeout()));
    }
}
