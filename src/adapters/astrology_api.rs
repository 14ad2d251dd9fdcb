use crate::domain::model::{BirthRecord, PlanetPosition};
use crate::domain::ports::{ConfigProvider, InterpretationService};
use crate::utils::error::{ChartError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Response body: either `{planets: [...]}` or a bare planet array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlanetsResponse {
    Wrapped { planets: Vec<PlanetPosition> },
    Bare(Vec<PlanetPosition>),
}

impl PlanetsResponse {
    fn into_planets(self) -> Vec<PlanetPosition> {
        match self {
            Self::Wrapped { planets } => planets,
            Self::Bare(planets) => planets,
        }
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    user_id: String,
    api_key: String,
}

/// HTTP client for the astrology interpretation API.
#[derive(Debug, Clone)]
pub struct AstrologyApiClient {
    client: Client,
    endpoint: String,
    credentials: Option<Credentials>,
    language: Option<String>,
}

impl AstrologyApiClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials: None,
            language: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut api = Self::new(
            config.api_endpoint(),
            Duration::from_secs(config.request_timeout_secs()),
        )?;
        if let (Some(user_id), Some(api_key)) = (config.api_user_id(), config.api_key()) {
            api = api.with_credentials(user_id, api_key);
        }
        if let Some(language) = config.language() {
            api = api.with_language(language);
        }
        Ok(api)
    }

    pub fn with_credentials(mut self, user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            user_id: user_id.into(),
            api_key: api_key.into(),
        });
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InterpretationService for AstrologyApiClient {
    async fn planets(&self, record: &BirthRecord) -> Result<Vec<PlanetPosition>> {
        tracing::debug!("Making interpretation API request to: {}", self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(record);

        // 基本認證
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.user_id, Some(&credentials.api_key));
        }

        if let Some(language) = &self.language {
            request = request.header("Accept-Language", language);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Interpretation API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChartError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: PlanetsResponse = response.json().await.map_err(|e| ChartError::SignApi {
            message: format!("malformed planets response: {}", e),
        })?;

        Ok(body.into_planets())
    }
}
