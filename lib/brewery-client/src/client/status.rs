use http::StatusCode;
use tracing::warn;
use url::Url;

use super::ClientError;

/// Maximum number of bytes of a response body kept in error messages.
pub(crate) const BODY_MAX_LENGTH: usize = 1024;

/// Passes successful responses through, turns the others into a [`ClientError`].
///
/// The body of a failed response is read and truncated to [`BODY_MAX_LENGTH`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response
        .text()
        .await
        .map(truncate_body)
        .unwrap_or_else(|e| format!("<unable to read response body: {e}>"));
    warn!(%status, %url, "unexpected status");

    Err(status_error(status, &url, body))
}

/// Maps a non-success status to its error variant.
pub(crate) fn status_error(status: StatusCode, url: &Url, body: String) -> ClientError {
    let url = url.to_string();
    if status == StatusCode::NOT_FOUND {
        ClientError::NotFound { url }
    } else if status.is_server_error() {
        ClientError::Server {
            status: status.as_u16(),
            url,
            body,
        }
    } else {
        ClientError::Client {
            status: status.as_u16(),
            url,
            body,
        }
    }
}

/// Truncates a body to [`BODY_MAX_LENGTH`] bytes on a char boundary.
pub(crate) fn truncate_body(text: String) -> String {
    if text.len() <= BODY_MAX_LENGTH {
        return text;
    }
    let end = (0..=BODY_MAX_LENGTH)
        .rev()
        .find(|idx| text.is_char_boundary(*idx))
        .unwrap_or_default();
    let head = text.get(..end).unwrap_or_default();
    format!("{head}... (truncated)")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn url() -> Url {
        Url::parse("http://localhost:8080/api/v1/beer/42").expect("valid url")
    }

    #[test]
    fn should_map_not_found() {
        let error = status_error(StatusCode::NOT_FOUND, &url(), "missing".to_string());

        assert!(error.is_not_found());
        insta::assert_snapshot!(error.to_string(), @"Resource not found: http://localhost:8080/api/v1/beer/42");
    }

    #[rstest]
    #[case::bad_request(StatusCode::BAD_REQUEST, false)]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, false)]
    #[case::conflict(StatusCode::CONFLICT, false)]
    #[case::redirect(StatusCode::FOUND, false)]
    #[case::internal(StatusCode::INTERNAL_SERVER_ERROR, true)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, true)]
    fn should_map_status(#[case] status: StatusCode, #[case] server: bool) {
        let error = status_error(status, &url(), "oops".to_string());

        assert_eq!(error.status(), Some(status.as_u16()));
        if server {
            assert!(matches!(error, ClientError::Server { .. }));
        } else {
            assert!(matches!(error, ClientError::Client { .. }));
        }
    }

    #[test]
    fn should_keep_short_body() {
        let body = "x".repeat(BODY_MAX_LENGTH);
        assert_eq!(truncate_body(body.clone()), body);
    }

    #[test]
    fn should_truncate_long_body() {
        let body = "x".repeat(BODY_MAX_LENGTH + 10);

        let truncated = truncate_body(body);

        assert!(truncated.ends_with("... (truncated)"));
        assert_eq!(truncated.len(), BODY_MAX_LENGTH + "... (truncated)".len());
    }

    #[test]
    fn should_truncate_on_char_boundary() {
        // 'é' is two bytes, so byte 1024 falls inside a char
        let body = format!("x{}", "é".repeat(BODY_MAX_LENGTH));

        let truncated = truncate_body(body);

        let head = truncated.trim_end_matches("... (truncated)");
        assert_eq!(head.len(), BODY_MAX_LENGTH - 1);
    }
}
