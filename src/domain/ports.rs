use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn platform(&self) -> &str;
    fn candidates_dir(&self) -> Option<&Path>;
    fn timeout_seconds(&self) -> u64;
    fn retry_attempts(&self) -> u32;
    fn retry_delay_millis(&self) -> u64;
    fn width(&self) -> usize;
}

/// Raw text endpoints of the candidates API.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn candidate_list(&self) -> Result<String>;
    async fn candidate_versions(
        &self,
        candidate: &str,
        current: Option<&str>,
        installed: &[String],
    ) -> Result<String>;
    async fn default_version(&self, candidate: &str) -> Result<String>;
    async fn candidate_names(&self) -> Result<Vec<String>>;
}
