//! One-shot request through the egress proxy.

use http_body_util::BodyExt;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::error::EgressError;
use super::payload::{parse_customers, CustomerRecord};
use super::proxy::ProxyConfig;
use super::request::ApiRequest;

/// Result of a successful egress check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EgressOutcome {
    /// No proxy is configured, so the sandbox has no network at all. No
    /// connection was attempted.
    NetworkDisabled,
    /// The API answered through the proxy with a valid payload.
    Reachable {
        /// HTTP status of the response.
        status: u16,
        /// Decoded records.
        customers: Vec<CustomerRecord>,
    },
}

/// Raw response collected from the proxy.
#[derive(Debug)]
struct ApiResponse {
    status: u16,
    body: bytes::Bytes,
}

/// Aborts the connection driver task when dropped, closing the socket on
/// every exit path.
struct ConnectionDriver(JoinHandle<()>);

impl Drop for ConnectionDriver {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Fetch `request` through `proxy` and validate the response.
///
/// Without a proxy this returns [`EgressOutcome::NetworkDisabled`] and never
/// touches the network; direct connections are not a fallback. The whole
/// exchange (connect, send, body) is bounded by `timeout`. No retries.
pub async fn validate(
    proxy: Option<&ProxyConfig>,
    request: &ApiRequest,
    limit: u32,
    timeout: Duration,
) -> Result<EgressOutcome, EgressError> {
    let Some(proxy) = proxy else {
        info!("No proxy configured, network is fully disabled; skipping request");
        return Ok(EgressOutcome::NetworkDisabled);
    };

    info!("Requesting {} via proxy {}", request.url(), proxy);

    let response = match tokio::time::timeout(timeout, send_through_proxy(proxy, request)).await
    {
        Ok(result) => result?,
        Err(_) => {
            // The in-flight future has been dropped, taking the connection with it.
            warn!("Request to {} timed out after {:?}", request.url(), timeout);
            return Err(EgressError::Timeout { after: timeout });
        }
    };

    debug!(
        "Received status {} with {} byte body",
        response.status,
        response.body.len()
    );

    let customers = parse_customers(response.status, &response.body, limit)?;

    Ok(EgressOutcome::Reachable {
        status: response.status,
        customers,
    })
}

async fn send_through_proxy(
    proxy: &ProxyConfig,
    request: &ApiRequest,
) -> Result<ApiResponse, EgressError> {
    let transport = |message: String| EgressError::Transport {
        proxy: proxy.authority(),
        message,
    };

    let stream = TcpStream::connect((proxy.host.as_str(), proxy.port))
        .await
        .map_err(|e| transport(e.to_string()))?;
    debug!("Connected to proxy {}", proxy);

    let (mut sender, connection) = http1::handshake(TokioIo::new(stream))
        .await
        .map_err(|e| transport(e.to_string()))?;

    let _driver = ConnectionDriver(tokio::spawn(async move {
        if let Err(e) = connection.await {
            debug!("Proxy connection ended: {}", e);
        }
    }));

    let response = sender
        .send_request(request.to_http()?)
        .await
        .map_err(|e| transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| transport(format!("reading response body: {}", e)))?
        .to_bytes();

    Ok(ApiResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn request() -> ApiRequest {
        ApiRequest::new("https://api.example.test", "/v1/customers?limit=3", "sk_test_abc").unwrap()
    }

    async fn read_head(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    async fn one_shot_proxy(status_line: &'static str, body: &'static str) -> (ProxyConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let head = read_head(&mut stream).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            head
        });

        let proxy = ProxyConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
        };
        (proxy, handle)
    }

    #[tokio::test]
    async fn test_no_proxy_means_network_disabled() {
        let outcome = validate(None, &request(), 3, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(outcome, EgressOutcome::NetworkDisabled);
    }

    #[tokio::test]
    async fn test_request_is_tunneled_through_proxy() {
        let (proxy, server) = one_shot_proxy(
            "HTTP/1.1 200 OK",
            r#"{"data": [{"id": "cus_1", "email": "a@example.com", "created": 1700000000}]}"#,
        )
        .await;

        let outcome = validate(Some(&proxy), &request(), 3, Duration::from_secs(5))
            .await
            .unwrap();

        let head = server.await.unwrap();
        let lower = head.to_ascii_lowercase();
        assert!(head.starts_with("GET https://api.example.test/v1/customers?limit=3 HTTP/1.1\r\n"));
        assert!(lower.contains("\r\nhost: api.example.test\r\n"));
        assert!(lower.contains("\r\nauthorization: bearer sk_test_abc\r\n"));

        match outcome {
            EgressOutcome::Reachable { status, customers } => {
                assert_eq!(status, 200);
                assert_eq!(customers.len(), 1);
                assert_eq!(customers[0].id, "cus_1");
            }
            other => panic!("expected reachable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refused_proxy_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let proxy = ProxyConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
        };

        let err = validate(Some(&proxy), &request(), 3, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, EgressError::Transport { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_silent_proxy_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_head(&mut stream).await;
            // Hold the connection open until the client gives up.
            let mut rest = Vec::new();
            let _ = stream.read_to_end(&mut rest).await;
        });

        let proxy = ProxyConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
        };

        let err = validate(Some(&proxy), &request(), 3, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, EgressError::Timeout { .. }), "got {:?}", err);

        // The client side was closed, so the server sees EOF and finishes.
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("connection was not released after timeout")
            .unwrap();
    }

    #[tokio::test]
    async fn test_garbage_body_is_payload_error() {
        let (proxy, _server) = one_shot_proxy("HTTP/1.1 502 Bad Gateway", "upstream unavailable").await;

        let err = validate(Some(&proxy), &request(), 3, Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            EgressError::Payload { status, head, .. } => {
                assert_eq!(status, 502);
                assert_eq!(head, "upstream unavailable");
            }
            other => panic!("expected payload error, got {:?}", other),
        }
    }
}
