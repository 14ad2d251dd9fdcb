use crate::domain::model::{
    BirthRecord, FlatBirthData, RawBirthData, StructuredBirthData,
};
use crate::utils::error::{ChartError, Result};
use serde_json::{Map, Value};

const DEFAULT_TIME_OF_BIRTH: &str = "12:00";

/// Normalizes raw birth data in either accepted shape into a `BirthRecord`.
pub fn normalize(raw: &Value) -> Result<BirthRecord> {
    let shape = RawBirthData::detect(raw)?;
    let record = shape.into_record()?;
    tracing::debug!(
        "Normalized birth data: {:04}-{:02}-{:02} {:02}:{:02} at ({}, {}) tz {}",
        record.year(),
        record.month(),
        record.day(),
        record.hour(),
        record.min(),
        record.lat(),
        record.lon(),
        record.tzone()
    );
    Ok(record)
}

fn has_field(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(|v| !v.is_null())
}

impl RawBirthData {
    /// 依固定順序判斷輸入格式：先結構化，再扁平
    pub fn detect(raw: &Value) -> Result<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| ChartError::normalization("invalid birth data format"))?;

        if has_field(obj, "dateOfBirth") && has_field(obj, "geo") {
            tracing::debug!("Detected structured birth data");
            let data: StructuredBirthData = serde_json::from_value(raw.clone()).map_err(|e| {
                ChartError::normalization(format!("invalid structured birth data: {}", e))
            })?;
            return Ok(Self::Structured(data));
        }

        if has_field(obj, "day") && has_field(obj, "lat") {
            tracing::debug!("Detected flat birth data");
            let data: FlatBirthData = serde_json::from_value(raw.clone()).map_err(|e| {
                ChartError::normalization(format!("invalid flat birth data: {}", e))
            })?;
            return Ok(Self::Flat(data));
        }

        Err(ChartError::normalization("invalid birth data format"))
    }

    pub fn into_record(self) -> Result<BirthRecord> {
        let fields = match self {
            Self::Structured(data) => data.into_fields(),
            Self::Flat(data) => data,
        };
        fields.into_record()
    }
}

fn parse_component(segment: Option<&str>) -> Option<f64> {
    segment.and_then(|s| s.trim().parse::<f64>().ok())
}

impl StructuredBirthData {
    /// 拆解日期與時間字串；無法解析的欄位視為缺漏
    fn into_fields(self) -> FlatBirthData {
        let mut date = self.date_of_birth.split('-');
        let year = parse_component(date.next());
        let month = parse_component(date.next());
        let day = parse_component(date.next());

        let time_str = self
            .time_of_birth
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TIME_OF_BIRTH);
        let mut time = time_str.split(':');
        let hour = parse_component(time.next());
        let min = parse_component(time.next());

        FlatBirthData {
            day,
            month,
            year,
            hour,
            min,
            lat: self.geo.latitude,
            lon: self.geo.longitude,
            // 時區未從座標推導
            tzone: Some(0.0),
        }
    }
}

fn whole_number(field: &str, value: f64) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(ChartError::normalization(format!(
            "{} must be a whole number, got {}",
            field, value
        )));
    }
    Ok(value as i64)
}

fn non_negative(field: &str, value: f64) -> Result<u32> {
    let n = whole_number(field, value)?;
    u32::try_from(n).map_err(|_| {
        ChartError::normalization(format!("{} is out of range: {}", field, value))
    })
}

impl FlatBirthData {
    fn into_record(self) -> Result<BirthRecord> {
        // 0 對時、分、經緯度是合法值，只有日期欄位要求非零
        let (day, month, year) = match (self.day, self.month, self.year) {
            (Some(d), Some(m), Some(y)) if d != 0.0 && m != 0.0 && y != 0.0 => (d, m, y),
            _ => {
                return Err(ChartError::normalization(
                    "incomplete birth data: day, month and year are required",
                ))
            }
        };

        let mut missing = Vec::new();
        if self.hour.is_none() {
            missing.push("hour");
        }
        if self.min.is_none() {
            missing.push("min");
        }
        if self.lat.is_none() {
            missing.push("lat");
        }
        if self.lon.is_none() {
            missing.push("lon");
        }
        let (Some(hour), Some(min), Some(lat), Some(lon)) = (self.hour, self.min, self.lat, self.lon)
        else {
            return Err(ChartError::normalization(format!(
                "incomplete birth data: missing {}",
                missing.join(", ")
            )));
        };

        let year = i32::try_from(whole_number("year", year)?)
            .map_err(|_| ChartError::normalization(format!("year is out of range: {}", year)))?;

        BirthRecord::new(
            non_negative("day", day)?,
            non_negative("month", month)?,
            year,
            non_negative("hour", hour)?,
            non_negative("min", min)?,
            lat,
            lon,
            self.tzone.unwrap_or(0.0),
        )
    }
}
