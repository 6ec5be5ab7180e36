use async_trait::async_trait;

use crate::entities::Dataset;

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    async fn load_dataset(&self, path: &str) -> anyhow::Result<Dataset>;
}
