//! Parsing helpers for query and path parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{CreatedRange, Error, Granularity, UnknownGranularity};

/// Query string of `GET /users/analytics`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AnalyticsParams {
    /// `hour`, `day` or `month`; defaults to `day`.
    pub timeframe: Option<String>,
}

/// Query string of `GET /users/filter`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RangeParams {
    /// Inclusive lower bound on `createdAt`.
    pub start: Option<String>,
    /// Exclusive upper bound on `createdAt`.
    pub end: Option<String>,
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an absolute instant.
///
/// RFC 3339 offsets are honoured. Timestamps without an offset and bare
/// dates are read as UTC.
pub(crate) fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, Error> {
    let text = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| Error::invalid_argument(format!("invalid {field}: {raw}")))
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| Error::missing_parameter(field))
}

impl RangeParams {
    /// Both bounds are required.
    pub(crate) fn to_range(&self) -> Result<CreatedRange, Error> {
        let start = required("start", self.start.as_deref())?;
        let end = required("end", self.end.as_deref())?;
        Ok(CreatedRange::new(
            parse_instant("start", start)?,
            parse_instant("end", end)?,
        ))
    }
}

impl AnalyticsParams {
    pub(crate) fn granularity(&self) -> Result<Granularity, Error> {
        match self.timeframe.as_deref().map(str::trim) {
            None | Some("") => Ok(Granularity::default()),
            Some(raw) => raw
                .parse()
                .map_err(|err: UnknownGranularity| Error::invalid_argument(err.to_string())),
        }
    }
}
