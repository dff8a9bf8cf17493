use chrono::{Local, TimeZone, Utc};
use diesel::prelude::*;
use diesel::{r2d2::ConnectionManager, SqliteConnection};
use serde::Serializer;
use serde_derive::Serialize;

use super::schema::*;

// type alias to use in multiple places
pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub type SensorIdType = i64;

/// A single persisted reading.
///
/// Field order matches the column tuple selected by the store queries.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct SensorReading {
    #[serde(rename = "sensor-id")]
    pub sensor_id: SensorIdType,
    #[serde(rename = "reading-type")]
    pub reading_type: String,
    pub value: f64,
    #[serde(rename = "timestamp", serialize_with = "serialize_read_time")]
    pub read_time: f64,
}

impl SensorReading {
    pub fn timestamp(&self) -> Option<String> {
        format_read_time(self.read_time)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sensor)]
pub struct NewReading<'a> {
    pub sensor_id: SensorIdType,
    pub reading_type: &'a str,
    pub value: f64,
    pub read_time: f64,
}

/// Current wall-clock time as fractional seconds since the epoch.
pub fn now_seconds() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

/// Renders seconds since the epoch as an ISO-8601 local time.
///
/// The fractional part is written with microsecond precision and omitted
/// entirely when it rounds to zero, e.g. `2019-06-01T12:30:00` or
/// `2019-06-01T12:30:00.250000`.
pub fn format_read_time(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }

    let mut whole = seconds.floor();
    let mut micros = ((seconds - whole) * 1_000_000.0).round() as u32;
    if micros >= 1_000_000 {
        whole += 1.0;
        micros = 0;
    }
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }

    let local = Local.timestamp_opt(whole as i64, micros * 1000).earliest()?.naive_local();
    let formatted = if micros == 0 {
        local.format("%Y-%m-%dT%H:%M:%S")
    } else {
        local.format("%Y-%m-%dT%H:%M:%S%.6f")
    };
    Some(formatted.to_string())
}

fn serialize_read_time<S: Serializer>(read_time: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match format_read_time(*read_time) {
        Some(x) => serializer.serialize_str(&x),
        None => Err(serde::ser::Error::custom(format!("Invalid timestamp: {}", read_time))),
    }
}
