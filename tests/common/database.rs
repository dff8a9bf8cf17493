use std::fs;
use std::path::PathBuf;

use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;
use rand::Rng;

use sensor_server::AppData;

/// A migrated database in a throwaway file, removed on drop.
pub struct TestDb {
    pub data: AppData,
    path: PathBuf,
}

impl TestDb {
    pub fn new() -> TestDb {
        let name = format!("sensor_server_test_{:016x}.sqlite", rand::thread_rng().gen::<u64>());
        let path = std::env::temp_dir().join(name);

        let data = AppData::new(path.to_str().expect("Temp path is not UTF-8"), 4)
            .expect("Cannot create pool");
        data.setup_migrations().expect("Cannot run migrations");

        TestDb { data, path }
    }

    pub fn conn(&self) -> PooledConnection<ConnectionManager<SqliteConnection>> {
        self.data.get_connection().expect("Cannot get connection")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
