use actix_web::{middleware, HttpServer};
use log::info;

use sensor_server::AppData;
use sensor_server::settings::Settings;
use sensor_server::web::create_app;

fn io_error<E: std::fmt::Display>(error: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env();
    let data = AppData::new(&settings.database_url, settings.pool_size).map_err(io_error)?;

    if std::env::args().nth(1).as_deref() == Some("init-db") {
        data.reset_database().map_err(io_error)?;
        println!("Initialized the database.");
        return Ok(());
    }

    data.setup_migrations().map_err(io_error)?;

    info!("Serving {} on {}", settings.database_url, settings.bind_address);

    // Start http server
    HttpServer::new(move || {
        create_app(data.clone())
            // enable logger
            .wrap(middleware::Logger::default())
    })
        .bind(settings.bind_address.as_str())?
        .run()
        .await
}
