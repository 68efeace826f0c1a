//! Conversions from external infrastructure errors into graph errors.

use goplay_domain::{GraphError, TransportErrorKind};
use reqwest::Error as HttpError;

/// Conversion that needs the effective URL of the failed call, which
/// `reqwest` errors only know without the form body.
pub trait IntoGraphError {
    fn into_graph_error(self, url: &str) -> GraphError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GraphError */
/* -------------------------------------------------------------------------- */

impl IntoGraphError for HttpError {
    fn into_graph_error(self, url: &str) -> GraphError {
        GraphError::Transport { kind: classify(&self), message: describe(&self), url: url.to_string() }
    }
}

fn classify(err: &HttpError) -> TransportErrorKind {
    if err.is_timeout() {
        return TransportErrorKind::Timeout;
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return TransportErrorKind::Connect;
    }

    if err.is_body() || err.is_decode() {
        TransportErrorKind::Body
    } else if err.is_request() || err.is_builder() || err.is_redirect() {
        TransportErrorKind::Request
    } else {
        TransportErrorKind::Other
    }
}

/// Error text including the source chain (DNS and TLS details live there).
fn describe(err: &HttpError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn refused_connection_maps_to_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = format!("http://{addr}/x?access_token=T&method=get");

        let err = Client::new().post(format!("http://{addr}/x")).send().await.unwrap_err();

        match err.into_graph_error(&url) {
            GraphError::Transport { kind, url: reported, .. } => {
                assert_eq!(kind, TransportErrorKind::Connect);
                assert_eq!(kind.code(), 7);
                assert_eq!(reported, url);
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_response_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = Client::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let err = client.post(server.uri()).send().await.unwrap_err();

        let converted = err.into_graph_error(&server.uri());
        assert!(matches!(
            converted,
            GraphError::Transport { kind: TransportErrorKind::Timeout, .. }
        ));
        assert_eq!(converted.code(), Some(28));
    }
}
