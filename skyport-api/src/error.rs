use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skyport_core::DomainError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ForbiddenError(String),
    ValidationError(String),
    EmptyOrderError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::ValidationError(msg),
            DomainError::Conflict(msg) => AppError::ConflictError(msg),
            DomainError::EmptyOrder => AppError::EmptyOrderError(err.to_string()),
            DomainError::NotFound(msg) => AppError::NotFoundError(msg),
            DomainError::Forbidden(msg) => AppError::ForbiddenError(msg),
            DomainError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ForbiddenError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::EmptyOrderError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_variants_map_to_the_right_status() {
        let cases = [
            (DomainError::Validation("row 0 is out of range".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("seat taken".into()), StatusCode::CONFLICT),
            (DomainError::EmptyOrder, StatusCode::BAD_REQUEST),
            (DomainError::NotFound("no such flight".into()), StatusCode::NOT_FOUND),
            (DomainError::Forbidden("not your order".into()), StatusCode::FORBIDDEN),
            (DomainError::Internal("pool exhausted".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let response =
            AppError::InternalServerError("secret connection string".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
