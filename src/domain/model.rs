use crate::utils::error::{ChartError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The twelve tropical zodiac signs, starting from Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All 12 signs in order (0 = Aries, 11 = Pisces).
pub const ALL_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    /// Lowercase canonical name, as stored and returned to clients.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "aries",
            Self::Taurus => "taurus",
            Self::Gemini => "gemini",
            Self::Cancer => "cancer",
            Self::Leo => "leo",
            Self::Virgo => "virgo",
            Self::Libra => "libra",
            Self::Scorpio => "scorpio",
            Self::Sagittarius => "sagittarius",
            Self::Capricorn => "capricorn",
            Self::Aquarius => "aquarius",
            Self::Pisces => "pisces",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        ALL_SIGNS.get(index).copied()
    }

    pub const fn all() -> &'static [ZodiacSign; 12] {
        &ALL_SIGNS
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSign(pub String);

impl fmt::Display for UnknownSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown zodiac sign: {}", self.0)
    }
}

impl std::error::Error for UnknownSign {}

impl FromStr for ZodiacSign {
    type Err = UnknownSign;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ALL_SIGNS
            .iter()
            .copied()
            .find(|sign| sign.name() == lowered)
            .ok_or_else(|| UnknownSign(s.to_string()))
    }
}

/// Canonical birth data. Serializes as the interpretation API payload
/// `{day, month, year, hour, min, lat, lon, tzone}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BirthRecord {
    day: u32,
    month: u32,
    year: i32,
    hour: u32,
    min: u32,
    lat: f64,
    lon: f64,
    tzone: f64,
}

impl BirthRecord {
    /// 只接受存在於公曆中的日期；時間範圍不在此檢查
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        day: u32,
        month: u32,
        year: i32,
        hour: u32,
        min: u32,
        lat: f64,
        lon: f64,
        tzone: f64,
    ) -> Result<Self> {
        if day == 0 || month == 0 || year == 0 {
            return Err(ChartError::normalization(
                "day, month and year are required",
            ));
        }
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(ChartError::normalization(format!(
                "{:04}-{:02}-{:02} is not a valid calendar date",
                year, month, day
            )));
        }
        if !lat.is_finite() || !lon.is_finite() || !tzone.is_finite() {
            return Err(ChartError::normalization(
                "coordinates and timezone must be finite numbers",
            ));
        }

        Ok(Self {
            day,
            month,
            year,
            hour,
            min,
            lat,
            lon,
            tzone,
        })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn tzone(&self) -> f64 {
        self.tzone
    }
}

/// Geographic coordinates as sent by the quiz (`geo` object).
#[derive(Debug, Clone, Deserialize)]
pub struct GeoPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// `{dateOfBirth, timeOfBirth?, geo}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredBirthData {
    pub date_of_birth: String,
    #[serde(default)]
    pub time_of_birth: Option<String>,
    pub geo: GeoPoint,
}

/// `{day, month, year, hour, min, lat, lon, tzone?}`
#[derive(Debug, Clone, Deserialize)]
pub struct FlatBirthData {
    pub day: Option<f64>,
    pub month: Option<f64>,
    pub year: Option<f64>,
    pub hour: Option<f64>,
    pub min: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub tzone: Option<f64>,
}

/// The two accepted input shapes.
#[derive(Debug, Clone)]
pub enum RawBirthData {
    Structured(StructuredBirthData),
    Flat(FlatBirthData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignSource {
    Api,
    Fallback,
    None,
}

/// Outcome of sign resolution, tagged with the path that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SignResolution {
    #[serde(rename_all = "camelCase")]
    Api {
        sun_sign: Option<ZodiacSign>,
        moon_sign: Option<ZodiacSign>,
    },
    #[serde(rename_all = "camelCase")]
    Fallback {
        sun_sign: ZodiacSign,
        moon_sign: ZodiacSign,
    },
    None,
}

impl SignResolution {
    pub fn source(&self) -> SignSource {
        match self {
            Self::Api { .. } => SignSource::Api,
            Self::Fallback { .. } => SignSource::Fallback,
            Self::None => SignSource::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPlacement {
    pub sun_sign: Option<ZodiacSign>,
    pub moon_sign: Option<ZodiacSign>,
    pub source: SignSource,
}

impl SignPlacement {
    pub fn unresolved() -> Self {
        Self {
            sun_sign: None,
            moon_sign: None,
            source: SignSource::None,
        }
    }
}

impl From<SignResolution> for SignPlacement {
    fn from(resolution: SignResolution) -> Self {
        match resolution {
            SignResolution::Api {
                sun_sign,
                moon_sign,
            } => Self {
                sun_sign,
                moon_sign,
                source: SignSource::Api,
            },
            SignResolution::Fallback {
                sun_sign,
                moon_sign,
            } => Self {
                sun_sign: Some(sun_sign),
                moon_sign: Some(moon_sign),
                source: SignSource::Fallback,
            },
            SignResolution::None => Self::unresolved(),
        }
    }
}

/// One entry of the interpretation API's `planets` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub name: String,
    #[serde(default)]
    pub sign: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Per-request result, persisted and returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartReport {
    pub success: bool,
    pub chart_id: String,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub birth_record: Option<BirthRecord>,
    pub sun_sign: Option<ZodiacSign>,
    pub moon_sign: Option<ZodiacSign>,
    pub source: SignSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_parsing_is_case_insensitive() {
        assert_eq!("Aries".parse::<ZodiacSign>().unwrap(), ZodiacSign::Aries);
        assert_eq!(" PISCES ".parse::<ZodiacSign>().unwrap(), ZodiacSign::Pisces);
        assert!("ophiuchus".parse::<ZodiacSign>().is_err());
    }

    #[test]
    fn test_sign_indices_follow_zodiac_order() {
        for (i, sign) in ZodiacSign::all().iter().enumerate() {
            assert_eq!(sign.index(), i);
            assert_eq!(ZodiacSign::from_index(i), Some(*sign));
        }
        assert_eq!(ZodiacSign::from_index(12), None);
    }

    #[test]
    fn test_birth_record_rejects_impossible_dates() {
        assert!(BirthRecord::new(29, 2, 2024, 12, 0, 0.0, 0.0, 0.0).is_ok());
        assert!(BirthRecord::new(29, 2, 2023, 12, 0, 0.0, 0.0, 0.0).is_err());
        assert!(BirthRecord::new(0, 1, 2000, 12, 0, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_birth_record_serializes_as_api_payload() {
        let record = BirthRecord::new(15, 6, 1990, 12, 0, 40.7, -74.0, 0.0).unwrap();
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "day": 15, "month": 6, "year": 1990, "hour": 12, "min": 0,
                "lat": 40.7, "lon": -74.0, "tzone": 0.0
            })
        );
    }

    #[test]
    fn test_resolution_serializes_with_kind_tag() {
        let resolution = SignResolution::Fallback {
            sun_sign: ZodiacSign::Gemini,
            moon_sign: ZodiacSign::Capricorn,
        };
        let json = serde_json::to_value(resolution).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "fallback", "sunSign": "gemini", "moonSign": "capricorn"})
        );

        let none = serde_json::to_value(SignResolution::None).unwrap();
        assert_eq!(none, serde_json::json!({"kind": "none"}));
    }

    #[test]
    fn test_placement_from_resolution() {
        let placement = SignPlacement::from(SignResolution::Api {
            sun_sign: Some(ZodiacSign::Leo),
            moon_sign: None,
        });
        assert_eq!(placement.source, SignSource::Api);
        assert_eq!(placement.sun_sign, Some(ZodiacSign::Leo));
        assert_eq!(placement.moon_sign, None);

        assert_eq!(SignPlacement::from(SignResolution::None), SignPlacement::unresolved());
    }
}
