use crate::core::{lunar, zodiac};
use crate::domain::model::{BirthRecord, PlanetPosition, SignResolution, ZodiacSign};
use crate::domain::ports::InterpretationService;
use crate::utils::error::{ChartError, Result};

/// Resolves sun and moon signs: interpretation API first, local approximation
/// second. Each stage runs at most once and `resolve` never fails.
pub struct SignResolver<S: InterpretationService> {
    service: S,
}

impl<S: InterpretationService> SignResolver<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn resolve(&self, record: &BirthRecord) -> SignResolution {
        match self.resolve_from_api(record).await {
            Ok(resolution) => {
                tracing::info!("🔭 Signs resolved from interpretation API");
                return resolution;
            }
            Err(e) => {
                tracing::warn!("⚠️ Interpretation API unavailable, using fallback: {}", e);
            }
        }

        match resolve_fallback(record) {
            Ok(resolution) => {
                tracing::info!("🌙 Signs approximated locally");
                resolution
            }
            Err(e) => {
                tracing::error!("❌ Fallback sign calculation failed: {}", e);
                SignResolution::None
            }
        }
    }

    async fn resolve_from_api(&self, record: &BirthRecord) -> Result<SignResolution> {
        let planets = self.service.planets(record).await?;
        tracing::debug!("Interpretation API returned {} planets", planets.len());

        let sun_sign = find_sign(&planets, "sun");
        let moon_sign = find_sign(&planets, "moon");

        if sun_sign.is_none() && moon_sign.is_none() {
            return Err(ChartError::SignApi {
                message: "no sun or moon placement in response".to_string(),
            });
        }

        Ok(SignResolution::Api {
            sun_sign,
            moon_sign,
        })
    }
}

/// 取出指定行星的星座，名稱比對不分大小寫
fn find_sign(planets: &[PlanetPosition], body: &str) -> Option<ZodiacSign> {
    let planet = planets.iter().find(|p| p.name.eq_ignore_ascii_case(body))?;
    let sign = planet.sign.as_deref()?;
    match sign.to_lowercase().parse::<ZodiacSign>() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Ignoring {} placement: {}", body, e);
            None
        }
    }
}

/// Local approximation: calendar lookup for the sun, lunar phase for the moon.
pub fn resolve_fallback(record: &BirthRecord) -> Result<SignResolution> {
    let sun_sign = zodiac::zodiac_sign(record.month(), record.day()).ok_or_else(|| {
        ChartError::FallbackComputation {
            message: format!(
                "no sun sign for month {} day {}",
                record.month(),
                record.day()
            ),
        }
    })?;
    let moon_sign = lunar::approximate_moon_sign(record)?;

    Ok(SignResolution::Fallback {
        sun_sign,
        moon_sign,
    })
}
