use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};

use crate::AppData;

pub mod api_service;
pub mod errors;
pub mod reading_form;
pub mod reading_service;

/// Builds the application with its routes and the JSON catch-all 404.
pub fn create_app(data: AppData) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(data))
        .configure(api_service::config)
        .default_service(web::to(reading_service::not_found))
}
