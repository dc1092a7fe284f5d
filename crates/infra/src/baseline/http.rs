use std::time::Duration;

use async_trait::async_trait;

use stocktake_inventory::BaselineRecord;

use super::{BaselineError, BaselineSource, TabularFormat};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Baseline downloaded over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    format: TabularFormat,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, format: TabularFormat) -> Self {
        Self {
            url: url.into(),
            format,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl BaselineSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<BaselineRecord>, BaselineError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| BaselineError::Fetch(e.to_string()))?;

        let resp = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| BaselineError::Fetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(BaselineError::Http {
                status: resp.status().as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| BaselineError::Fetch(e.to_string()))?;
        let records = self.format.parse(&bytes)?;
        tracing::debug!(url = %self.url, rows = records.len(), "baseline downloaded");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
