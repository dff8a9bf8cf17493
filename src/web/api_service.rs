use actix_web::web;

use super::reading_service::*;

/// Maximum accepted size of an "add reading" body.
pub const PAYLOAD_LIMIT: usize = 4096;

fn resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(method_not_allowed))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/").route(web::get().to(list_readings)))
        .service(resource("/add/").route(web::post().to(add_reading)))
        .service(resource("/sensors/").route(web::get().to(list_sensor_ids)))
        .service(resource("/sensors/{sensor_id}").route(web::get().to(readings_by_sensor)))
        .service(resource("/types/").route(web::get().to(list_reading_types)))
        .service(resource("/types/{reading_type}").route(web::get().to(readings_by_type)));
}
