//! Integration tests for `HttpBackend` against a throwaway local server.
//!
//! The server speaks just enough HTTP/1.1 to read one request and write
//! one canned response, and hands the raw request back to the test so
//! headers and body can be checked.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use warden_backend::{outcome_of, Backend, BackendError, HttpBackend};
use warden_protocol::{Codec, JsonCodec, ReportRequest, VerificationOutcome, VerifyRequest};

// =========================================================================
// Helpers
// =========================================================================

/// A captured request: lowercased head and raw body.
struct Captured {
    head: String,
    body: String,
}

/// Starts a one-shot server that replies with `status` and `body`.
/// Returns the base URL and a receiver for the captured request.
async fn serve_once(status: u16, body: &'static str) -> (String, oneshot::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .map(|v| v.trim().parse::<usize>().unwrap())
            .unwrap_or(0);
        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let req_body =
            String::from_utf8_lossy(&buf[head_end..head_end + content_length]).into_owned();

        let response = format!(
            "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        let _ = tx.send(Captured {
            head,
            body: req_body,
        });
    });

    (format!("http://{addr}"), rx)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn verify_request() -> VerifyRequest {
    VerifyRequest {
        username: "Steve".into(),
        client_ip: "203.0.113.9".into(),
    }
}

// =========================================================================
// verify()
// =========================================================================

#[tokio::test]
async fn test_verify_sends_contract_and_parses_valid() {
    let (base, captured) = serve_once(200, r#"{"valid":true}"#).await;
    let backend = HttpBackend::new(&base, "s3cret", Duration::from_secs(5)).unwrap();

    let response = backend.verify(verify_request()).await.unwrap();
    let req = captured.await.unwrap();

    assert_eq!(response.valid, Some(true));
    assert!(req.head.starts_with("post /auth/verify-player http/1.1"));
    assert!(req.head.contains("content-type: application/json"));
    assert!(req.head.contains("accept: application/json"));
    assert!(req.head.contains("x-api-key: s3cret"));
    assert!(req.head.contains("user-agent: warden/"));

    let body: VerifyRequest = JsonCodec.decode(req.body.as_bytes()).unwrap();
    assert_eq!(body, verify_request());
}

#[tokio::test]
async fn test_verify_without_api_key_omits_header() {
    let (base, captured) = serve_once(200, r#"{"valid":true}"#).await;
    let backend = HttpBackend::new(&base, "", Duration::from_secs(5)).unwrap();

    backend.verify(verify_request()).await.unwrap();
    let req = captured.await.unwrap();

    assert!(!req.head.contains("x-api-key"));
}

#[tokio::test]
async fn test_verify_rejection_reason_survives() {
    let (base, _captured) = serve_once(200, r#"{"valid":false,"reason":"token_expired"}"#).await;
    let backend = HttpBackend::new(&base, "", Duration::from_secs(5)).unwrap();

    let outcome = outcome_of(backend.verify(verify_request()).await);

    assert_eq!(
        outcome,
        VerificationOutcome::Rejected {
            reason: "token_expired".into()
        }
    );
}

#[tokio::test]
async fn test_verify_403_detail_is_backend_error() {
    let (base, _captured) = serve_once(403, r#"{"detail":"invalid api key"}"#).await;
    let backend = HttpBackend::new(&base, "wrong", Duration::from_secs(5)).unwrap();

    let result = backend.verify(verify_request()).await;
    assert!(matches!(result, Err(BackendError::Status { status: 403, .. })));

    assert_eq!(
        outcome_of(result),
        VerificationOutcome::BackendError {
            detail: "invalid api key".into()
        }
    );
}

#[tokio::test]
async fn test_verify_garbage_body_is_malformed() {
    let (base, _captured) = serve_once(200, "<html>oops</html>").await;
    let backend = HttpBackend::new(&base, "", Duration::from_secs(5)).unwrap();

    let outcome = outcome_of(backend.verify(verify_request()).await);

    assert!(matches!(outcome, VerificationOutcome::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_verify_connection_refused_is_transport_error() {
    // Bind then drop to get a port nobody is listening on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let backend = HttpBackend::new(&format!("http://{addr}"), "", Duration::from_secs(5)).unwrap();

    let outcome = outcome_of(backend.verify(verify_request()).await);

    assert!(matches!(
        outcome,
        VerificationOutcome::TransportError {
            timed_out: false,
            ..
        }
    ));
}

#[tokio::test]
async fn test_verify_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and hold the socket open without ever answering.
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    let backend =
        HttpBackend::new(&format!("http://{addr}"), "", Duration::from_millis(200)).unwrap();

    let result = backend.verify(verify_request()).await;

    assert!(matches!(result, Err(BackendError::Timeout(_))));
    assert!(matches!(
        outcome_of(result),
        VerificationOutcome::TransportError { timed_out: true, .. }
    ));
}

// =========================================================================
// report()
// =========================================================================

#[tokio::test]
async fn test_report_posts_violation_and_returns_body() {
    let (base, captured) = serve_once(200, r#"{"message":"saved","id":7}"#).await;
    let backend = HttpBackend::new(&base, "k", Duration::from_secs(5)).unwrap();

    let body = backend
        .report(ReportRequest {
            username: "Alex".into(),
            client_ip: "198.51.100.4".into(),
            violation_count: 5,
            reason: "anticheat_auto_kick".into(),
        })
        .await
        .unwrap();
    let req = captured.await.unwrap();

    assert_eq!(body, r#"{"message":"saved","id":7}"#);
    assert!(req.head.starts_with("post /anticheat/report http/1.1"));
    assert!(req.body.contains(r#""violation_count":5"#));
    assert!(req.body.contains(r#""reason":"anticheat_auto_kick""#));
}

#[tokio::test]
async fn test_report_error_status_is_error() {
    let (base, _captured) = serve_once(500, "boom").await;
    let backend = HttpBackend::new(&base, "", Duration::from_secs(5)).unwrap();

    let result = backend
        .report(ReportRequest {
            username: "Alex".into(),
            client_ip: "198.51.100.4".into(),
            violation_count: 5,
            reason: "anticheat_auto_kick".into(),
        })
        .await;

    assert!(matches!(result, Err(BackendError::Status { status: 500, .. })));
}
