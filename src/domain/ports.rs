use crate::domain::model::{BirthRecord, PlanetPosition};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_user_id(&self) -> Option<&str>;
    fn api_key(&self) -> Option<&str>;
    fn language(&self) -> Option<&str>;
    fn request_timeout_secs(&self) -> u64;
    fn output_path(&self) -> &str;
}

/// External astrology interpretation service.
#[async_trait]
pub trait InterpretationService: Send + Sync {
    async fn planets(&self, record: &BirthRecord) -> Result<Vec<PlanetPosition>>;
}
