//! Tests of the Hub client against a local HTTP server.
//!
//! The server answers fixed routes (a parquet listing, parquet shards and
//! error statuses), so the listing status mapping, shard concatenation and
//! cache layout are checked without network access.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use hf_export::hub::{shard_cache_path, FetchOptions, HubClient, HubConfig};
use hf_export::{FetchError, Value};

type Routes = HashMap<String, (u16, Vec<u8>)>;

struct MockHub {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockHub {
    fn client(&self) -> HubClient {
        let config = HubConfig::default().with_endpoint(format!("http://{}", self.addr));
        HubClient::new(config).unwrap()
    }

    fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Bind a server on an ephemeral port; `routes` receives the bound address
/// so listings can point at shard URLs on the same server.
async fn serve(routes: impl FnOnce(SocketAddr) -> Routes) -> MockHub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes(addr));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let log = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head);
                let path = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                log.lock().unwrap().push(path.clone());

                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, b"Not Found".to_vec()));
                let header = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes()).await;
                let _ = stream.write_all(&body).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    MockHub { addr, requests }
}

fn shard(texts: &[&str], labels: &[i64]) -> Vec<u8> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("text", DataType::Utf8, true),
        Field::new("label", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(texts.to_vec())),
        Arc::new(Int64Array::from(labels.to_vec())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let mut out = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut out, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    out
}

const LISTING_PATH: &str = "/api/datasets/org/news/parquet";

fn news_routes(addr: SocketAddr, shard0: &[u8], shard1: &[u8]) -> Routes {
    let listing = serde_json::json!({
        "default": {
            "train": [
                format!("http://{}/shards/train-0.parquet", addr),
                format!("http://{}/shards/train-1.parquet", addr),
            ],
            "test": [format!("http://{}/shards/test-0.parquet", addr)],
        }
    });
    HashMap::from([
        (LISTING_PATH.to_string(), (200, listing.to_string().into_bytes())),
        ("/shards/train-0.parquet".to_string(), (200, shard0.to_vec())),
        ("/shards/train-1.parquet".to_string(), (200, shard1.to_vec())),
    ])
}

#[tokio::test]
async fn test_fetch_split_concatenates_shards_and_fills_cache_dir() {
    let shard0 = shard(&["Markets rally", "Rates hold"], &[1, 1]);
    let shard1 = shard(&["Moon made of cheese"], &[0]);
    let (s0, s1) = (shard0.clone(), shard1.clone());
    let hub = serve(move |addr| news_routes(addr, &s0, &s1)).await;
    let cache = TempDir::new().unwrap();

    let options = FetchOptions::new("train").with_cache_dir(Some(cache.path().to_path_buf()));
    let split = hub.client().fetch_split("org/news", &options).await.unwrap();

    assert_eq!(split.name(), "train");
    assert_eq!(split.len(), 3);
    let texts: Vec<&Value> = split.records().iter().filter_map(|r| r.get("text")).collect();
    assert_eq!(
        texts,
        vec![
            &Value::from("Markets rally"),
            &Value::from("Rates hold"),
            &Value::from("Moon made of cheese"),
        ]
    );
    assert_eq!(split.get(2).unwrap().get("label"), Some(&Value::Int(0)));

    let cached0 = shard_cache_path(cache.path(), "org/news", "default", "train", 0);
    let cached1 = shard_cache_path(cache.path(), "org/news", "default", "train", 1);
    assert!(cached0.ends_with("datasets/org___news/default/train/00000.parquet"));
    assert_eq!(std::fs::read(&cached0).unwrap(), shard0);
    assert_eq!(std::fs::read(&cached1).unwrap(), shard1);

    assert_eq!(
        hub.requested(),
        vec![
            LISTING_PATH.to_string(),
            "/shards/train-0.parquet".to_string(),
            "/shards/train-1.parquet".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_listing_status_maps_to_error_variants() {
    let hub = serve(|_| {
        HashMap::from([
            ("/api/datasets/org/gated/parquet".to_string(), (403, b"gated".to_vec())),
            ("/api/datasets/org/private/parquet".to_string(), (401, Vec::new())),
            ("/api/datasets/org/broken/parquet".to_string(), (500, b"boom".to_vec())),
        ])
    })
    .await;
    let client = hub.client();

    let missing = client.parquet_listing("org/missing").await;
    assert!(
        matches!(missing, Err(FetchError::DatasetNotFound(ref id)) if id == "org/missing"),
        "Expected DatasetNotFound, got: {:?}",
        missing
    );

    let gated = client.parquet_listing("org/gated").await;
    assert!(matches!(gated, Err(FetchError::Unauthorized(ref id)) if id == "org/gated"));

    let private = client.parquet_listing("org/private").await;
    assert!(matches!(private, Err(FetchError::Unauthorized(_))));

    let broken = client.parquet_listing("org/broken").await;
    assert!(
        matches!(broken, Err(FetchError::Http { status: 500, ref body }) if body == "boom"),
        "Expected Http 500, got: {:?}",
        broken
    );
}

#[tokio::test]
async fn test_missing_split_downloads_nothing() {
    let shard0 = shard(&["a"], &[0]);
    let hub = serve(move |addr| news_routes(addr, &shard0, &shard0)).await;
    let cache = TempDir::new().unwrap();

    let options =
        FetchOptions::new("validation").with_cache_dir(Some(cache.path().to_path_buf()));
    let result = hub.client().fetch_split("org/news", &options).await;

    match result {
        Err(FetchError::SplitNotFound { split, available }) => {
            assert_eq!(split, "validation");
            assert_eq!(available, vec!["test".to_string(), "train".to_string()]);
        }
        other => panic!("Expected SplitNotFound, got: {:?}", other),
    }
    assert!(hub.requested().iter().all(|p| !p.starts_with("/shards/")));
    assert!(!cache.path().join("datasets").exists());
}

#[tokio::test]
async fn test_missing_shard_reports_http_status() {
    let shard0 = shard(&["a"], &[0]);
    let hub = serve(move |addr| {
        let mut routes = news_routes(addr, &shard0, &shard0);
        routes.remove("/shards/train-1.parquet");
        routes
    })
    .await;

    let result = hub
        .client()
        .fetch_split("org/news", &FetchOptions::new("train"))
        .await;

    assert!(
        matches!(result, Err(FetchError::Http { status: 404, .. })),
        "Expected Http 404, got: {:?}",
        result
    );
    assert!(hub
        .requested()
        .contains(&"/shards/train-1.parquet".to_string()));
}
