use rand::seq::SliceRandom;

use sensor_server::models::now_seconds;
use sensor_server::readings;

mod common;

use common::database::TestDb;

#[test]
fn test_insert_then_list() {
    let db = TestDb::new();
    let mut conn = db.conn();

    let before = now_seconds();
    let reading = readings::insert(&mut conn, 7, "temperature", 21.5).unwrap();
    assert!(reading.read_time >= before);
    assert!(reading.timestamp().is_some());

    let all = readings::list_all(&mut conn).unwrap();
    assert_eq!(all, vec![reading]);
}

#[test]
fn test_list_all_is_ordered_by_time() {
    let db = TestDb::new();
    let mut conn = db.conn();

    let mut times: Vec<f64> = (0..30i32).map(|x| 1_500_000_000.0 + f64::from(x) * 1.5).collect();
    times.shuffle(&mut rand::thread_rng());

    for (i, time) in times.iter().enumerate() {
        readings::insert_at(&mut conn, i as i64 % 4, "pressure", i as f64, *time).unwrap();
    }

    let all = readings::list_all(&mut conn).unwrap();
    assert_eq!(all.len(), times.len());
    assert!(all.windows(2).all(|x| x[0].read_time <= x[1].read_time));

    let by_sensor = readings::list_by_sensor(&mut conn, 2).unwrap();
    assert!(by_sensor.windows(2).all(|x| x[0].read_time <= x[1].read_time));
}

#[test]
fn test_equal_times_keep_insertion_order() {
    let db = TestDb::new();
    let mut conn = db.conn();

    for value in &[3.0, 1.0, 2.0] {
        readings::insert_at(&mut conn, 1, "rain", *value, 1_600_000_000.0).unwrap();
    }

    let values: Vec<f64> = readings::list_all(&mut conn).unwrap().iter().map(|x| x.value).collect();
    assert_eq!(values, vec![3.0, 1.0, 2.0]);
}

#[test]
fn test_filters_match_exactly() {
    let db = TestDb::new();
    let mut conn = db.conn();

    readings::insert_at(&mut conn, 1, "temperature", 21.5, 100.0).unwrap();
    readings::insert_at(&mut conn, 10, "Temperature", 19.0, 101.0).unwrap();
    readings::insert_at(&mut conn, 1, "humidity", 40.0, 102.0).unwrap();

    let by_sensor = readings::list_by_sensor(&mut conn, 1).unwrap();
    assert_eq!(by_sensor.len(), 2);
    assert!(by_sensor.iter().all(|x| x.sensor_id == 1));

    let by_type = readings::list_by_type(&mut conn, "temperature").unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].sensor_id, 1);

    assert!(readings::list_by_sensor(&mut conn, 3).unwrap().is_empty());
    assert!(readings::list_by_type(&mut conn, "temp").unwrap().is_empty());
}

#[test]
fn test_distinct_values_are_sorted() {
    let db = TestDb::new();
    let mut conn = db.conn();

    assert!(readings::distinct_sensor_ids(&mut conn).unwrap().is_empty());
    assert!(readings::distinct_reading_types(&mut conn).unwrap().is_empty());

    let data = [(12, "wind"), (-3, "co2"), (12, "humidity"), (2, "wind"), (-3, "Wind")];
    for (sensor_id, reading_type) in data.iter() {
        readings::insert(&mut conn, *sensor_id, reading_type, 1.0).unwrap();
    }

    assert_eq!(readings::distinct_sensor_ids(&mut conn).unwrap(), vec![-3, 2, 12]);
    assert_eq!(readings::distinct_reading_types(&mut conn).unwrap(), vec!["Wind", "co2", "humidity", "wind"]);
}

#[test]
fn test_reset_database_clears_readings() {
    let db = TestDb::new();

    {
        let mut conn = db.conn();
        readings::insert(&mut conn, 1, "temperature", 20.0).unwrap();
    }

    db.data.reset_database().unwrap();

    let mut conn = db.conn();
    assert!(readings::list_all(&mut conn).unwrap().is_empty());
    readings::insert(&mut conn, 1, "temperature", 20.0).unwrap();
    assert_eq!(readings::list_all(&mut conn).unwrap().len(), 1);
}

#[test]
fn test_concurrent_inserts_wait_for_lock() {
    let db = TestDb::new();

    let workers: Vec<_> = (0..8i64).map(|sensor_id| {
        let data = db.data.clone();
        std::thread::spawn(move || {
            let mut failed = 0;
            for i in 0..50 {
                let mut conn = data.get_connection().unwrap();
                if readings::insert(&mut conn, sensor_id, "load", f64::from(i)).is_err() {
                    failed += 1;
                }
            }
            failed
        })
    }).collect();

    let failed: i32 = workers.into_iter().map(|x| x.join().unwrap()).sum();
    assert_eq!(failed, 0);

    let mut conn = db.conn();
    assert_eq!(readings::list_all(&mut conn).unwrap().len(), 400);
    assert_eq!(readings::distinct_sensor_ids(&mut conn).unwrap(), (0..8).collect::<Vec<i64>>());
}
