use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use diesel::SqliteConnection;
use futures::StreamExt;
use log::info;
use serde_derive::Serialize;

use crate::AppData;
use crate::models::{SensorIdType, SensorReading};
use crate::readings;

use super::api_service::PAYLOAD_LIMIT;
use super::errors::{ServiceError, ServiceResult};
use super::reading_form::{collect_fields, NewReadingRequest};

#[derive(Serialize)]
pub struct ReadingList {
    #[serde(rename = "sensor-readings")]
    pub readings: Vec<SensorReading>,
}

#[derive(Serialize)]
pub struct SensorReadingList {
    #[serde(rename = "sensor-id")]
    pub sensor_id: SensorIdType,
    #[serde(rename = "sensor-readings")]
    pub readings: Vec<SensorReading>,
}

#[derive(Serialize)]
pub struct TypeReadingList {
    #[serde(rename = "reading-type")]
    pub reading_type: String,
    #[serde(rename = "sensor-readings")]
    pub readings: Vec<SensorReading>,
}

#[derive(Serialize)]
pub struct SensorIdList {
    #[serde(rename = "sensor-ids")]
    pub sensor_ids: Vec<SensorIdType>,
}

#[derive(Serialize)]
pub struct ReadingTypeList {
    #[serde(rename = "sensor-types")]
    pub reading_types: Vec<String>,
}

/// Runs `f` on the blocking pool with a connection that lives only as long
/// as the call.
async fn with_connection<T, F>(ctx: &web::Data<AppData>, f: F) -> ServiceResult<T>
    where F: FnOnce(&mut SqliteConnection) -> ServiceResult<T> + Send + 'static,
          T: Send + 'static {
    let ctx = ctx.clone();
    web::block(move || {
        let mut conn = ctx.get_connection()?;
        f(&mut conn)
    }).await?
}

pub async fn list_readings(ctx: web::Data<AppData>) -> ServiceResult<HttpResponse> {
    let readings = with_connection(&ctx, readings::list_all).await?;
    Ok(HttpResponse::Ok().json(ReadingList { readings }))
}

/// Buffers the request body, giving up as soon as it grows past `limit`.
async fn read_body(mut payload: web::Payload, limit: usize) -> ServiceResult<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|x| ServiceError::BadRequest(format!("Failed to read request body: {}", x)))?;
        if body.len() + chunk.len() > limit {
            return Err(ServiceError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

pub async fn add_reading(ctx: web::Data<AppData>, req: HttpRequest, payload: web::Payload) -> ServiceResult<HttpResponse> {
    let body = read_body(payload, PAYLOAD_LIMIT).await?;
    let fields = collect_fields(req.query_string(), req.content_type(), &body)?;
    let data = NewReadingRequest::from_fields(&fields)?;

    let reading = with_connection(&ctx, move |conn| {
        readings::insert(conn, data.sensor_id, &data.reading_type, data.value)
    }).await?;

    info!("Added {} reading for sensor {}", reading.reading_type, reading.sensor_id);
    Ok(HttpResponse::Created().json(reading))
}

pub async fn list_sensor_ids(ctx: web::Data<AppData>) -> ServiceResult<HttpResponse> {
    let sensor_ids = with_connection(&ctx, readings::distinct_sensor_ids).await?;
    Ok(HttpResponse::Ok().json(SensorIdList { sensor_ids }))
}

pub async fn list_reading_types(ctx: web::Data<AppData>) -> ServiceResult<HttpResponse> {
    let reading_types = with_connection(&ctx, readings::distinct_reading_types).await?;
    Ok(HttpResponse::Ok().json(ReadingTypeList { reading_types }))
}

pub async fn readings_by_sensor(ctx: web::Data<AppData>, sensor_id: web::Path<String>) -> ServiceResult<HttpResponse> {
    let raw_id = sensor_id.into_inner();
    let not_found = || ServiceError::NotFound(format!("Sensor Id {} doesn't exist", raw_id));

    // An id that isn't an integer can't match any stored reading
    let sensor_id: SensorIdType = raw_id.trim().parse().map_err(|_| not_found())?;

    let readings = with_connection(&ctx, move |conn| readings::list_by_sensor(conn, sensor_id)).await?;
    if readings.is_empty() {
        return Err(not_found());
    }

    Ok(HttpResponse::Ok().json(SensorReadingList { sensor_id, readings }))
}

pub async fn readings_by_type(ctx: web::Data<AppData>, reading_type: web::Path<String>) -> ServiceResult<HttpResponse> {
    let reading_type = reading_type.into_inner();

    let query_type = reading_type.clone();
    let readings = with_connection(&ctx, move |conn| readings::list_by_type(conn, &query_type)).await?;
    if readings.is_empty() {
        return Err(ServiceError::NotFound(format!("Reading Type {} doesn't exist", reading_type)));
    }

    Ok(HttpResponse::Ok().json(TypeReadingList { reading_type, readings }))
}

pub async fn method_not_allowed() -> ServiceResult<HttpResponse> {
    Err(ServiceError::MethodNotAllowed)
}

pub async fn not_found() -> ServiceResult<HttpResponse> {
    Err(ServiceError::NotFound("The requested URL was not found on the server".to_string()))
}
