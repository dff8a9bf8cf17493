//! Access to the append-only `sensor` table.
//!
//! Every function works on a connection borrowed from the caller, which is
//! expected to be checked out of the pool for the duration of one request.

use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use crate::models::{now_seconds, NewReading, SensorIdType, SensorReading};
use crate::schema::sensor::dsl;
use crate::web::errors::ServiceResult;

/// Records a reading stamped with the current time.
pub fn insert(conn: &mut SqliteConnection, sensor_id: SensorIdType, reading_type: &str, value: f64) -> ServiceResult<SensorReading> {
    insert_at(conn, sensor_id, reading_type, value, now_seconds())
}

pub fn insert_at(
    conn: &mut SqliteConnection,
    sensor_id: SensorIdType,
    reading_type: &str,
    value: f64,
    read_time: f64,
) -> ServiceResult<SensorReading> {
    let data = NewReading {
        sensor_id,
        reading_type,
        value,
        read_time,
    };
    diesel::insert_into(dsl::sensor)
        .values(&data)
        .execute(conn)?;

    debug!("Stored reading {} for sensor {} at {}", reading_type, sensor_id, read_time);

    Ok(SensorReading {
        sensor_id,
        reading_type: reading_type.to_string(),
        value,
        read_time,
    })
}

pub fn list_all(conn: &mut SqliteConnection) -> ServiceResult<Vec<SensorReading>> {
    Ok(dsl::sensor
        .select((dsl::sensor_id, dsl::reading_type, dsl::value, dsl::read_time))
        .order((dsl::read_time.asc(), dsl::id.asc()))
        .load::<SensorReading>(conn)?)
}

pub fn list_by_sensor(conn: &mut SqliteConnection, sensor_id: SensorIdType) -> ServiceResult<Vec<SensorReading>> {
    Ok(dsl::sensor
        .filter(dsl::sensor_id.eq(sensor_id))
        .select((dsl::sensor_id, dsl::reading_type, dsl::value, dsl::read_time))
        .order((dsl::read_time.asc(), dsl::id.asc()))
        .load::<SensorReading>(conn)?)
}

pub fn list_by_type(conn: &mut SqliteConnection, reading_type: &str) -> ServiceResult<Vec<SensorReading>> {
    Ok(dsl::sensor
        .filter(dsl::reading_type.eq(reading_type))
        .select((dsl::sensor_id, dsl::reading_type, dsl::value, dsl::read_time))
        .order((dsl::read_time.asc(), dsl::id.asc()))
        .load::<SensorReading>(conn)?)
}

pub fn distinct_sensor_ids(conn: &mut SqliteConnection) -> ServiceResult<Vec<SensorIdType>> {
    Ok(dsl::sensor
        .select(dsl::sensor_id)
        .distinct()
        .order(dsl::sensor_id.asc())
        .load::<SensorIdType>(conn)?)
}

// SQLite's default BINARY collation sorts bytewise
pub fn distinct_reading_types(conn: &mut SqliteConnection) -> ServiceResult<Vec<String>> {
    Ok(dsl::sensor
        .select(dsl::reading_type)
        .distinct()
        .order(dsl::reading_type.asc())
        .load::<String>(conn)?)
}
