use std::collections::BTreeMap;

use actix_web::web;
use serde_json::{Map, Value};

use crate::models::SensorIdType;

use super::errors::{ServiceError, ServiceResult};

pub const SENSOR_ID_KEY: &str = "sensor-id";
pub const READING_TYPE_KEY: &str = "reading-type";
pub const VALUE_KEY: &str = "value";

const SENSOR_ID_HELP: &str = "id of sensor; type: integer value";
const READING_TYPE_HELP: &str = "type of sensor reading; type: string";
const VALUE_HELP: &str = "value of sensor reading; type: floating point value";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A validated "add reading" request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReadingRequest {
    pub sensor_id: SensorIdType,
    pub reading_type: String,
    pub value: f64,
}

impl NewReadingRequest {
    /// Validates every field, reporting all the failing ones at once.
    pub fn from_fields(fields: &Map<String, Value>) -> ServiceResult<NewReadingRequest> {
        let mut errors = BTreeMap::new();

        let sensor_id = parse_sensor_id(fields.get(SENSOR_ID_KEY));
        if sensor_id.is_none() {
            errors.insert(SENSOR_ID_KEY.to_string(), SENSOR_ID_HELP.to_string());
        }
        let reading_type = parse_reading_type(fields.get(READING_TYPE_KEY));
        if reading_type.is_none() {
            errors.insert(READING_TYPE_KEY.to_string(), READING_TYPE_HELP.to_string());
        }
        let value = parse_value(fields.get(VALUE_KEY));
        if value.is_none() {
            errors.insert(VALUE_KEY.to_string(), VALUE_HELP.to_string());
        }

        match (sensor_id, reading_type, value) {
            (Some(sensor_id), Some(reading_type), Some(value)) => Ok(NewReadingRequest {
                sensor_id,
                reading_type,
                value,
            }),
            _ => Err(ServiceError::InvalidFields(errors)),
        }
    }
}

fn parse_sensor_id(raw: Option<&Value>) -> Option<SensorIdType> {
    match raw? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_reading_type(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn parse_value(raw: Option<&Value>) -> Option<f64> {
    let value = match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    // NaN and infinities cannot be stored in a NOT NULL REAL column
    if value.is_finite() { Some(value) } else { None }
}

fn parse_urlencoded(data: &str, fields: &mut Map<String, Value>) -> ServiceResult<()> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(data)
        .map_err(|_| ServiceError::BadRequest("Failed to decode form data".to_string()))?;
    for (key, value) in pairs.into_inner() {
        fields.insert(key, Value::String(value));
    }
    Ok(())
}

/// Gathers request arguments from the query string, then from the body.
///
/// Body fields override query fields with the same name. The body is read as
/// a urlencoded form when declared so, and as a JSON object otherwise.
pub fn collect_fields(query: &str, content_type: &str, body: &[u8]) -> ServiceResult<Map<String, Value>> {
    let mut fields = Map::new();

    if !query.is_empty() {
        parse_urlencoded(query, &mut fields)?;
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(fields);
    }

    if content_type.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
        let data = std::str::from_utf8(body)
            .map_err(|_| ServiceError::BadRequest("Failed to decode form data".to_string()))?;
        parse_urlencoded(data, &mut fields)?;
    } else {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(object)) => fields.extend(object),
            _ => return Err(ServiceError::BadRequest("Failed to decode JSON object".to_string())),
        }
    }

    Ok(fields)
}
