use crate::domain::model::{ProfileResult, UserInputs};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 刪除檔名以 `prefix` 開頭、副檔名相符且超過 `max_age` 的檔案，回傳刪除數量
    fn remove_stale(
        &self,
        prefix: &str,
        extension: &str,
        max_age: Duration,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn user_inputs(&self) -> Result<UserInputs>;
    fn seed(&self) -> Option<u64>;
    fn output_path(&self) -> &str;
    fn csv_filename(&self) -> String;
    fn write_seasonal_json(&self) -> bool;
    fn cleanup_max_age(&self) -> Option<Duration>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<UserInputs>;
    async fn transform(&self, inputs: UserInputs) -> Result<ProfileResult>;
    async fn load(&self, result: ProfileResult) -> Result<String>;
}
