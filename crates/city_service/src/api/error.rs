//! Plain-text API errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use types::CityServiceError;

/// Error returned by the city handlers, rendered as a plain-text body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<CityServiceError> for ApiError {
    fn from(err: CityServiceError) -> Self {
        let status = match err {
            CityServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CityServiceError::Storage(_) | CityServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::StorageError;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(CityServiceError::BadRequest("EOF while parsing".to_string()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Bad request: EOF while parsing");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ApiError::from(CityServiceError::Storage(StorageError::Io {
            path: "cities.csv".to_string(),
            source: io,
        }));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(CityServiceError::Internal("join".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
