// Append-only log of sensor readings, read_time is seconds since the epoch

table! {
    sensor (id) {
        id -> Integer,
        sensor_id -> BigInt,
        reading_type -> Text,
        value -> Double,
        read_time -> Double,
    }
}
