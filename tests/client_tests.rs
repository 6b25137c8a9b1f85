#![cfg(feature = "registry")]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use afm_check::ErrorKind;
use afm_check::registry::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const ACTIVE_PREFIXED: &str = include_str!("fixtures/active_prefixed.xml");
const ERROR_CODE: &str = include_str!("fixtures/error_code.xml");
const FAULT: &str = include_str!("fixtures/fault.xml");

// ---------------------------------------------------------------------------
// Mock registry
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl Captured {
    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last(&self) -> (String, String) {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

/// Read one HTTP/1.1 request; returns (head, body).
async fn read_request(stream: &mut TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|l| {
            let (k, v) = l.split_once(':')?;
            k.eq_ignore_ascii_case("content-length")
                .then(|| v.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    (head, body)
}

/// Serve `body` with `status` for every connection; returns the endpoint URL.
async fn mock_registry(status: u16, body: &'static str) -> (String, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Captured::default();
    let sink = captured.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let sink = sink.clone();
            tokio::spawn(async move {
                let request = read_request(&mut stream).await;
                sink.requests.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {status} Mock\r\nContent-Type: application/soap+xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.ok();
            });
        }
    });
    (format!("http://{addr}/rg"), captured)
}

/// Accept connections and never answer.
async fn silent_registry() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{addr}/rg")
}

fn client(endpoint: &str) -> RegistryClient {
    let cfg = RegistryConfig::new("TESTUSER", "TESTPASS")
        .endpoint(endpoint)
        .timeout(Duration::from_millis(500));
    RegistryClient::new(cfg).unwrap()
}

// ---------------------------------------------------------------------------
// Successful lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn query_active() {
    let (endpoint, captured) = mock_registry(200, ACTIVE_PREFIXED).await;
    let r = client(&endpoint).query("090000045").await.unwrap();
    assert!(r.valid);
    assert_eq!(r.status, RegistryStatus::Active);
    assert_eq!(r.afm.as_deref(), Some("090000045"));
    assert_eq!(captured.count(), 1);
}

#[tokio::test]
async fn request_is_soap_with_credentials() {
    let (endpoint, captured) = mock_registry(200, ACTIVE_PREFIXED).await;
    client(&endpoint).query("090000045").await.unwrap();

    let (head, body) = captured.last();
    assert!(head.starts_with("POST /rg HTTP/1.1"));
    assert!(
        head.to_ascii_lowercase()
            .contains("content-type: application/soap+xml;charset=utf-8")
    );
    assert!(body.contains("<ns1:Username>TESTUSER</ns1:Username>"));
    assert!(body.contains("<ns1:Password>TESTPASS</ns1:Password>"));
    assert!(body.contains("<ns3:afm_called_for>090000045</ns3:afm_called_for>"));
}

#[tokio::test]
async fn in_band_error_is_a_result() {
    let (endpoint, _) = mock_registry(200, ERROR_CODE).await;
    let r = client(&endpoint).query("090000045").await.unwrap();
    assert!(!r.valid);
    assert!(r.error_code.is_some());

    let v = client(&endpoint).verify("090000045").await;
    assert!(v.checksum_valid);
    assert_eq!(v.error_kind, Some(ErrorKind::Registry));
    assert!(!v.is_confirmed());
}

#[tokio::test]
async fn verify_confirms_active() {
    let (endpoint, _) = mock_registry(200, ACTIVE_PREFIXED).await;
    let v = client(&endpoint).verify("090000045").await;
    assert!(v.is_confirmed());
    assert_eq!(v.error_kind, None);
    assert_eq!(v.result.status, RegistryStatus::Active);
}

// ---------------------------------------------------------------------------
// Local rejection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checksum_failure_never_reaches_network() {
    let (endpoint, captured) = mock_registry(200, ACTIVE_PREFIXED).await;
    let c = client(&endpoint);

    let v = c.verify("090000046").await;
    assert!(!v.checksum_valid);
    assert_eq!(v.error_kind, Some(ErrorKind::InvalidChecksum));

    let v = c.verify("09000004").await;
    assert_eq!(v.error_kind, Some(ErrorKind::InvalidFormat));
    assert!(!v.is_confirmed());

    assert_eq!(captured.count(), 0);
}

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn timeout_is_bounded() {
    let endpoint = silent_registry().await;
    let c = client(&endpoint);

    let start = Instant::now();
    let err = tokio::time::timeout(Duration::from_secs(5), c.query("090000045"))
        .await
        .expect("query must resolve within its own timeout")
        .unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(matches!(err, RegistryError::Timeout(_)), "{err}");
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn timeout_becomes_error_outcome() {
    let endpoint = silent_registry().await;
    let r = client(&endpoint).query_outcome("090000045").await;
    assert!(!r.valid);
    assert_eq!(r.status, RegistryStatus::Unknown);
    assert_eq!(r.error_code.as_deref(), Some("TRANSPORT_ERROR"));
}

#[tokio::test]
async fn connection_refused() {
    // Bind and drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let v = client(&format!("http://{addr}/rg")).verify("090000045").await;
    assert!(v.checksum_valid);
    assert_eq!(v.error_kind, Some(ErrorKind::Transport));
    assert!(v.detail.is_some());
    assert!(!v.is_confirmed());
}

#[tokio::test]
async fn http_error_with_fault_reason() {
    let (endpoint, _) = mock_registry(500, FAULT).await;
    let err = client(&endpoint).query("090000045").await.unwrap_err();
    match err {
        RegistryError::Status { status, ref detail } => {
            assert_eq!(status, 500);
            assert!(detail.contains("Authentication failed"), "{detail}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn http_error_without_xml() {
    let (endpoint, _) = mock_registry(503, "Service Unavailable").await;
    let err = client(&endpoint).query("090000045").await.unwrap_err();
    assert!(matches!(err, RegistryError::Status { status: 503, .. }));
    assert!(err.to_string().contains("Service Unavailable"));
}

#[tokio::test]
async fn unparseable_success_body() {
    let (endpoint, _) = mock_registry(200, "<html><p>maintenance</html>").await;
    let v = client(&endpoint).verify("090000045").await;
    assert_eq!(v.error_kind, Some(ErrorKind::Parse));
    assert_eq!(v.result.error_code.as_deref(), Some("PARSE_ERROR"));
}
