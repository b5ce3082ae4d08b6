//! Internal helpers for mapping HTTP/reqwest failures to [`GenerateError`].

use localnote_types::GenerateError;

/// Map a pre-stream [`reqwest::Error`] (connect, DNS, TLS) to a
/// [`GenerateError::Connection`].
pub(crate) fn map_connect_error(err: reqwest::Error) -> GenerateError {
    GenerateError::Connection(err.to_string())
}

/// Map a non-success HTTP status (observed before streaming) to a
/// [`GenerateError::Status`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> GenerateError {
    GenerateError::Status {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_404_maps_with_body() {
        let err = map_http_status(reqwest::StatusCode::NOT_FOUND, "model 'foo' not found");
        match err {
            GenerateError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "model 'foo' not found");
            }
            other => panic!("expected Status, got: {other:?}"),
        }
    }

    #[test]
    fn status_500_maps_with_code() {
        let err = map_http_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, GenerateError::Status { status: 500, .. }));
    }

    #[test]
    fn status_errors_are_pre_stream() {
        let err = map_http_status(reqwest::StatusCode::BAD_REQUEST, "bad body");
        assert!(err.is_pre_stream());
    }

    #[test]
    fn empty_body_preserved() {
        let err = map_http_status(reqwest::StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, GenerateError::Status { body, .. } if body.is_empty()));
    }
}
