use services::{FetchError, HttpFetcher, ResourceFetcher};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Serve one canned response and hand back the raw request head.
async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });
    let base = Url::parse(&format!("http://{addr}/site/")).unwrap();
    (base, handle)
}

#[tokio::test]
async fn missing_resource_maps_to_http_status() {
    let (base, server) = serve_once("404 Not Found", "nope").await;
    let fetcher = HttpFetcher::new(base);

    let err = fetcher
        .fetch_text("test_sets/missing.json")
        .await
        .unwrap_err();
    match err {
        FetchError::HttpStatus { path, status } => {
            assert_eq!(path, "test_sets/missing.json");
            assert_eq!(status.as_u16(), 404);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn requests_bypass_caches() {
    let (base, server) = serve_once("200 OK", r#"["1"]"#).await;
    let fetcher = HttpFetcher::new(base);

    let body = fetcher.fetch_text("test_sets/set_1.json").await.unwrap();
    assert_eq!(body, r#"["1"]"#);

    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(
        request.starts_with("get /site/test_sets/set_1.json "),
        "{request}"
    );
    assert!(request.contains("cache-control: no-store"), "{request}");
}
