use crate::core::normalizer::normalize;
use crate::core::resolver::SignResolver;
use crate::domain::model::{ChartReport, SignPlacement, SignResolution};
use crate::domain::ports::{InterpretationService, Storage};
use crate::utils::error::Result;
use chrono::Utc;

/// Runs one chart request: normalize, resolve signs, persist the report.
pub struct ChartEngine<S: InterpretationService, T: Storage> {
    resolver: SignResolver<S>,
    storage: T,
    output_root: String,
}

impl<S: InterpretationService, T: Storage> ChartEngine<S, T> {
    pub fn new(resolver: SignResolver<S>, storage: T, output_root: impl Into<String>) -> Self {
        Self {
            resolver,
            storage,
            output_root: output_root.into(),
        }
    }

    pub fn resolver(&self) -> &SignResolver<S> {
        &self.resolver
    }

    pub async fn run(&self, raw: &serde_json::Value) -> Result<ChartReport> {
        let chart_id = Utc::now().format("%Y%m%dT%H%M%S%.6fZ").to_string();
        tracing::info!("Starting chart {}", chart_id);

        // Normalize：格式錯誤不中斷請求，只跳過星座解析
        let record = match normalize(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("⚠️ Skipping sign resolution: {}", e);
                tracing::warn!("💡 Suggestion: {}", e.recovery_suggestion());
                None
            }
        };

        // Resolve
        let resolution = match &record {
            Some(record) => self.resolver.resolve(record).await,
            None => SignResolution::None,
        };
        let placement = SignPlacement::from(resolution);
        tracing::info!(
            "Signs: sun={:?} moon={:?} source={:?}",
            placement.sun_sign,
            placement.moon_sign,
            placement.source
        );

        // Persist
        let key = format!("charts/{}.json", chart_id);
        let report = ChartReport {
            success: true,
            chart_id,
            birth_record: record,
            sun_sign: placement.sun_sign,
            moon_sign: placement.moon_sign,
            source: placement.source,
            output_path: Some(format!("{}/{}", self.output_root, key)),
        };

        let json_data = serde_json::to_vec_pretty(&report)?;
        tracing::debug!("Writing chart report ({} bytes) to storage", json_data.len());
        self.storage.write_file(&key, &json_data).await?;

        tracing::info!("✅ Chart {} saved", report.chart_id);
        Ok(report)
    }
}
