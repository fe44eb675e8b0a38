use crate::domain::model::{LoadSearchApiRequest, MultipleLoadDetailReturn};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn soap_action(&self) -> &str;
    fn request_timeout(&self) -> Duration;
}

/// Anything that can answer a load search. Failures are reported inside the
/// returned value rather than as `Err`.
#[async_trait]
pub trait LoadSearch: Send + Sync {
    async fn get_multiple_load_detail_results(
        &self,
        request: LoadSearchApiRequest,
    ) -> MultipleLoadDetailReturn;
}
