use std::collections::BTreeMap;

use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use diesel::result::Error as DBError;
use log::error;
use serde_json::json;

/// Message shown to clients in place of any internal failure detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error: {}", _0)]
    InternalServerError(String),

    #[display(fmt = "Bad Request: {}", _0)]
    BadRequest(String),

    #[display(fmt = "Invalid Fields: {:?}", _0)]
    InvalidFields(BTreeMap<String, String>),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "Method Not Allowed")]
    MethodNotAllowed,

    #[display(fmt = "Payload Too Large, limit is {} bytes", _0)]
    PayloadTooLarge(usize),
}

impl From<DBError> for ServiceError {
    fn from(error: DBError) -> ServiceError {
        match error {
            DBError::DatabaseError(kind, info) => {
                ServiceError::InternalServerError(format!("DB error, {:?} {}", kind, info.message()))
            }
            err => ServiceError::InternalServerError(format!("DB error, {}", err)),
        }
    }
}

impl From<diesel::ConnectionError> for ServiceError {
    fn from(error: diesel::ConnectionError) -> ServiceError {
        ServiceError::InternalServerError(format!("Connection error: {}", error))
    }
}

impl From<r2d2::Error> for ServiceError {
    fn from(error: r2d2::Error) -> ServiceError {
        ServiceError::InternalServerError(format!("Pool error: {}", error))
    }
}

impl From<BlockingError> for ServiceError {
    fn from(error: BlockingError) -> ServiceError {
        ServiceError::InternalServerError(format!("Blocking error: {}", error))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(error: std::io::Error) -> ServiceError {
        ServiceError::InternalServerError(format!("IO error: {}", error))
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::BadRequest(_) | ServiceError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::InternalServerError(x) => {
                error!("{}", x);
                json!({ "message": INTERNAL_ERROR_MESSAGE })
            }
            ServiceError::BadRequest(x) => json!({ "message": x }),
            ServiceError::InvalidFields(fields) => json!({ "message": fields }),
            ServiceError::NotFound(x) => json!({ "message": x }),
            ServiceError::MethodNotAllowed => json!({ "message": "The method is not allowed for the requested URL" }),
            ServiceError::PayloadTooLarge(limit) => json!({
                "message": format!("Request body exceeds the {} byte limit", limit)
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
