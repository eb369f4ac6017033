// username-check-lib/tests/integration.rs

//! End-to-end pipeline tests against an in-process HTTP responder.
//!
//! The responder speaks just enough HTTP/1.1 for reqwest: it reads one
//! request per connection, hands the body to a test-supplied closure, and
//! writes the closure's status + JSON body back. Each probe attempt opens
//! a fresh connection, so the responder's hit counter equals the number of
//! HTTP attempts the pipeline made.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use username_check_lib::{CheckerConfig, DedupStore, ProxyPool, UsernameChecker};

/// A minimal one-request-per-connection HTTP responder.
struct MockApi {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    /// Spawn a responder; `respond(hit_index, request_body)` returns the
    /// status code and JSON body to send back.
    async fn spawn<F>(respond: F) -> Self
    where
        F: Fn(usize, &str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let respond = Arc::new(respond);

        {
            let hits = Arc::clone(&hits);
            let bodies = Arc::clone(&bodies);
            tokio::spawn(async move {
                loop {
                    let Ok((socket, _)) = listener.accept().await else {
                        break;
                    };
                    let hits = Arc::clone(&hits);
                    let bodies = Arc::clone(&bodies);
                    let respond = Arc::clone(&respond);
                    tokio::spawn(async move {
                        handle_connection(socket, hits, bodies, respond).await;
                    });
                }
            });
        }

        Self { addr, hits, bodies }
    }

    fn endpoint(&self) -> String {
        format!("http://{}/check", self.addr)
    }

    fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn request_bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

async fn handle_connection<F>(
    mut socket: tokio::net::TcpStream,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<String>>>,
    respond: Arc<F>,
) where
    F: Fn(usize, &str) -> (u16, String) + Send + Sync,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    // Read until the header terminator.
    let header_end = loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            }
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let body_end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    let hit = hits.fetch_add(1, Ordering::SeqCst);
    bodies.lock().unwrap().push(body.clone());

    let (status, response_body) = respond(hit, &body);
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        reason,
        response_body.len(),
        response_body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Pull the `username` field back out of a request body.
fn username_of(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("username").and_then(|u| u.as_str()).map(String::from))
        .unwrap_or_default()
}

fn store_in(dir: &tempfile::TempDir) -> Arc<DedupStore> {
    Arc::new(
        DedupStore::load(dir.path().join("blacklist.txt"), dir.path().join("valids.txt")).unwrap(),
    )
}

fn config_for(api: &MockApi) -> CheckerConfig {
    CheckerConfig::default()
        .with_workers(4)
        .with_timeout(std::time::Duration::from_secs(5))
        .with_retry(false)
        .with_endpoint(api.endpoint())
}

#[tokio::test]
async fn test_full_run_classifies_and_persists() {
    // alice is taken, bob123 is available, retry disabled, no proxies,
    // no webhook.
    let api = MockApi::spawn(|_, body| {
        let taken = username_of(body) == "alice";
        (200, format!(r#"{{"taken":{}}}"#, taken))
    })
    .await;

    let dir = tempfile::tempdir().unwrap();
    let checker = UsernameChecker::new(config_for(&api), store_in(&dir), Arc::new(ProxyPool::default()))
        .unwrap();

    let summary = checker
        .run(vec!["alice".to_string(), "bob123".to_string()])
        .await;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.valid, 1);
    assert_eq!(summary.invalid, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(checker.stats().snapshot(), (1, 1));

    // Exactly one attempt per name: nothing was retried.
    assert_eq!(api.hit_count(), 2);

    // Checked-set ends containing both names; valid-log exactly bob123.
    let checked = std::fs::read_to_string(dir.path().join("blacklist.txt")).unwrap();
    let mut names: Vec<&str> = checked.lines().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["alice", "bob123"]);

    let valids = std::fs::read_to_string(dir.path().join("valids.txt")).unwrap();
    assert_eq!(valids, "bob123\n");
}

#[tokio::test]
async fn test_second_run_never_reprobes() {
    let api = MockApi::spawn(|_, _| (200, r#"{"taken":false}"#.to_string())).await;

    let dir = tempfile::tempdir().unwrap();
    let names = vec!["alice".to_string(), "bob123".to_string(), "carol9".to_string()];

    let checker =
        UsernameChecker::new(config_for(&api), store_in(&dir), Arc::new(ProxyPool::default()))
            .unwrap();
    checker.run(names.clone()).await;
    assert_eq!(api.hit_count(), 3);

    // Fresh checker over the same state files: everything skips, the API
    // sees no further traffic.
    let checker =
        UsernameChecker::new(config_for(&api), store_in(&dir), Arc::new(ProxyPool::default()))
            .unwrap();
    let summary = checker.run(names).await;

    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.invalid, 3);
    assert_eq!(summary.valid, 0);
    assert_eq!(api.hit_count(), 3);
}

#[tokio::test]
async fn test_retry_yields_final_attempt_result() {
    // Transport is fine but the API errors twice before answering; with
    // max_attempts = 3 the probe must surface the attempt-3 result.
    let api = MockApi::spawn(|hit, _| {
        if hit < 2 {
            (500, String::new())
        } else {
            (200, r#"{"taken":false}"#.to_string())
        }
    })
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = CheckerConfig::default()
        .with_workers(1)
        .with_timeout(std::time::Duration::from_secs(5))
        .with_retry(true)
        .with_max_attempts(3)
        .with_endpoint(api.endpoint());
    let checker =
        UsernameChecker::new(config, store_in(&dir), Arc::new(ProxyPool::default())).unwrap();

    let mut results = checker.check_stream(vec!["charlie".to_string()]);
    let result = results.recv().await.unwrap();
    assert!(results.recv().await.is_none());

    assert!(result.is_available());
    assert_eq!(result.attempts, 3);
    assert_eq!(api.hit_count(), 3);

    let valids = std::fs::read_to_string(dir.path().join("valids.txt")).unwrap();
    assert_eq!(valids, "charlie\n");
}

#[tokio::test]
async fn test_exhausted_retries_degrade_to_invalid() {
    // Always-500 API: with max_attempts = 2, charlie makes exactly two
    // attempts, degrades to probe-failed, is counted invalid, lands in the
    // checked-set, and never reaches the valid-log.
    let api = MockApi::spawn(|_, _| (500, String::new())).await;

    let dir = tempfile::tempdir().unwrap();
    let config = CheckerConfig::default()
        .with_workers(1)
        .with_timeout(std::time::Duration::from_secs(5))
        .with_retry(true)
        .with_max_attempts(2)
        .with_endpoint(api.endpoint());
    let checker =
        UsernameChecker::new(config, store_in(&dir), Arc::new(ProxyPool::default())).unwrap();

    let summary = checker.run(vec!["charlie".to_string()]).await;

    assert_eq!(api.hit_count(), 2);
    assert_eq!(summary.valid, 0);
    assert_eq!(summary.invalid, 1);

    let checked = std::fs::read_to_string(dir.path().join("blacklist.txt")).unwrap();
    assert_eq!(checked, "charlie\n");
    assert!(!dir.path().join("valids.txt").exists());
}

#[tokio::test]
async fn test_checked_set_complete_under_concurrency() {
    // 6 workers over 40 names against an always-taken API: the checked-set
    // file must end with exactly the input set, no duplicates, no losses.
    let api = MockApi::spawn(|_, _| (200, r#"{"taken":true}"#.to_string())).await;

    let dir = tempfile::tempdir().unwrap();
    let config = CheckerConfig::default()
        .with_workers(6)
        .with_timeout(std::time::Duration::from_secs(5))
        .with_retry(false)
        .with_endpoint(api.endpoint());
    let checker =
        UsernameChecker::new(config, store_in(&dir), Arc::new(ProxyPool::default())).unwrap();

    let names: Vec<String> = (0..40).map(|i| format!("user{:02}", i)).collect();
    let summary = checker.run(names.clone()).await;

    assert_eq!(summary.total, 40);
    assert_eq!(summary.invalid, 40);

    let checked = std::fs::read_to_string(dir.path().join("blacklist.txt")).unwrap();
    let mut persisted: Vec<&str> = checked.lines().collect();
    persisted.sort_unstable();
    let mut expected: Vec<&str> = names.iter().map(String::as_str).collect();
    expected.sort_unstable();
    assert_eq!(persisted, expected);
}

#[tokio::test]
async fn test_webhook_fires_only_for_available() {
    let api = MockApi::spawn(|_, body| {
        let taken = username_of(body) == "alice";
        (200, format!(r#"{{"taken":{}}}"#, taken))
    })
    .await;
    let hook = MockApi::spawn(|_, _| (200, String::new())).await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&api).with_webhook(format!("http://{}/hook", hook.addr));
    let checker =
        UsernameChecker::new(config, store_in(&dir), Arc::new(ProxyPool::default())).unwrap();

    checker
        .run(vec!["alice".to_string(), "bob123".to_string()])
        .await;

    // One delivery, for the available name only.
    assert_eq!(hook.hit_count(), 1);
    let bodies = hook.request_bodies();
    assert!(bodies[0].contains("bob123"));
    assert!(bodies[0].contains("Valid Username Found"));
}
