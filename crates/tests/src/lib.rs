//! # Integration Tests
//!
//! End-to-end tests over the assembled in-process relay:
//! HTTP ingest -> store / durable log / broadcast hub -> HTTP queries and
//! subscriber channels. No sockets are opened; the router is driven through
//! `tower::ServiceExt::oneshot` and subscribers attach to the hub directly.

#[cfg(test)]
mod contract_tests {
    use contracts::{Record, SourceId};
    use serde_json::json;

    #[test]
    fn test_record_wire_contract() {
        let record: Record =
            serde_json::from_value(json!({"kind": "sample", "source": 1, "pitch": 1.0, "ts": 9}))
                .unwrap();
        assert_eq!(record.source(), SourceId::new(1));
        assert_eq!(record.kind_str(), "sample");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use axum::body::{self, Body};
    use axum::Router;
    use contracts::{LogConfig, SourceId, WindowBounds};
    use dispatcher::{BroadcastHub, RecordLog};
    use http::{Request, StatusCode};
    use ingestion::IngestCoordinator;
    use serde_json::{json, Value};
    use server::RelayState;
    use source_store::RelayStore;
    use tempfile::TempDir;
    use tower::ServiceExt as _;

    /// Fully assembled in-process relay for one test.
    struct TestRelay {
        app: Router,
        coordinator: Arc<IngestCoordinator>,
        _log_dir: TempDir,
    }

    fn relay_with_capacity(max_buffer: usize) -> TestRelay {
        let log_dir = TempDir::new().unwrap();
        let store = Arc::new(RelayStore::new(max_buffer));
        let log = Arc::new(
            RecordLog::new(&LogConfig {
                dir: log_dir.path().to_path_buf(),
                queue_capacity: 64,
                summary: false,
            })
            .unwrap(),
        );
        let hub = Arc::new(BroadcastHub::new(Arc::clone(&store)));
        let coordinator = Arc::new(IngestCoordinator::new(store, log, hub));

        let app = server::create_router(RelayState {
            coordinator: Arc::clone(&coordinator),
            window: WindowBounds { min: 2, max: 100 },
        });

        TestRelay {
            app,
            coordinator,
            _log_dir: log_dir,
        }
    }

    fn relay() -> TestRelay {
        relay_with_capacity(100)
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// A posted sample is acknowledged and queryable as latest.
    #[tokio::test]
    async fn test_ingest_round_trip() {
        let relay = relay();

        let (status, body) = post(&relay.app, "/ingest/1", json!({"pitch": 10})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));

        let (status, body) = get(&relay.app, "/latest/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "sample");
        assert_eq!(body["source"], 1);
        assert_eq!(body["pitch"], 10.0);
        assert!(body["ts"].is_number());
    }

    /// A rejected object leaves no trace anywhere.
    #[tokio::test]
    async fn test_rejection_has_no_side_effects() {
        let relay = relay();
        let mut subscriber = relay.coordinator.hub().subscribe();

        let (status, body) = post(&relay.app, "/ingest/1", json!({"pitch": "abc"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "pitch must be a number");

        let (status, _) = get(&relay.app, "/latest/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, history) = get(&relay.app, "/history/1").await;
        assert_eq!(history, json!([]));

        assert!(subscriber.try_recv().is_none());
        assert!(relay.coordinator.log().open_sources().is_empty());
    }

    /// An event is appended to the source's jsonl log, one line,
    /// exact shape, and broadcast to subscribers.
    #[tokio::test]
    async fn test_event_persisted_and_broadcast() {
        let relay = relay();
        let mut subscriber = relay.coordinator.hub().subscribe();

        let (status, _) = post(
            &relay.app,
            "/ingest/2",
            json!({"event": "button_click", "ts": 123456}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let received = subscriber.recv().await.unwrap();
        assert_eq!(received.kind_str(), "event");
        assert_eq!(received.ts(), 123_456);

        relay.coordinator.log().shutdown().await;
        let content =
            std::fs::read_to_string(relay._log_dir.path().join("source-2.jsonl")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(
            parsed,
            json!({"kind": "event", "event": "button_click", "ts": 123456, "source": 2})
        );
    }

    /// Capacity + 1 records leave capacity retained,
    /// earliest remaining is the second one sent.
    #[tokio::test]
    async fn test_history_eviction_full_stack() {
        let capacity = 5;
        let relay = relay_with_capacity(capacity);

        for i in 0..(capacity + 1) {
            let (status, _) =
                post(&relay.app, "/ingest/1", json!({"pitch": i, "ts": 100 + i})).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, history) = get(&relay.app, "/history/1").await;
        let history = history.as_array().unwrap().clone();
        assert_eq!(history.len(), capacity);
        assert_eq!(history[0]["pitch"], 1.0);
        assert_eq!(history[capacity - 1]["pitch"], capacity as f64);
    }

    /// Both subscribers see every accepted record, in acceptance order.
    #[tokio::test]
    async fn test_fanout_fidelity() {
        let relay = relay();
        let mut sub_a = relay.coordinator.hub().subscribe();
        let mut sub_b = relay.coordinator.hub().subscribe();

        let bodies = [
            json!({"pitch": 1, "ts": 10}),
            json!({"event": "calibrate", "ts": 20}),
            json!({"pitch": 2, "ts": 30}),
        ];
        for body in &bodies {
            let (status, _) = post(&relay.app, "/ingest/1", body.clone()).await;
            assert_eq!(status, StatusCode::OK);
        }

        for subscriber in [&mut sub_a, &mut sub_b] {
            let ts: Vec<i64> = [
                subscriber.recv().await.unwrap(),
                subscriber.recv().await.unwrap(),
                subscriber.recv().await.unwrap(),
            ]
            .iter()
            .map(|r| r.ts())
            .collect();
            assert_eq!(ts, vec![10, 20, 30]);
        }
    }

    /// A late subscriber first receives the current latest of both
    /// sources, ascending by source id, before any live record.
    #[tokio::test]
    async fn test_late_subscriber_catch_up() {
        let relay = relay();

        post(&relay.app, "/ingest/2", json!({"pitch": 2, "ts": 200})).await;
        post(&relay.app, "/ingest/1", json!({"pitch": 1, "ts": 100})).await;
        post(&relay.app, "/ingest/1", json!({"pitch": 1.5, "ts": 150})).await;

        let mut subscriber = relay.coordinator.hub().subscribe();
        post(&relay.app, "/ingest/2", json!({"pitch": 3, "ts": 300})).await;

        let first = subscriber.recv().await.unwrap();
        let second = subscriber.recv().await.unwrap();
        let third = subscriber.recv().await.unwrap();

        assert_eq!(first.source(), SourceId::new(1));
        assert_eq!(first.ts(), 150);
        assert_eq!(second.source(), SourceId::new(2));
        assert_eq!(second.ts(), 200);
        assert_eq!(third.ts(), 300);
    }

    /// One subscriber dying mid-stream doesn't disturb the other.
    #[tokio::test]
    async fn test_subscriber_failure_isolated() {
        let relay = relay();
        let sub_a = relay.coordinator.hub().subscribe();
        let mut sub_b = relay.coordinator.hub().subscribe();

        post(&relay.app, "/ingest/1", json!({"pitch": 1, "ts": 1})).await;
        drop(sub_a);
        post(&relay.app, "/ingest/1", json!({"pitch": 2, "ts": 2})).await;
        post(&relay.app, "/ingest/1", json!({"pitch": 3, "ts": 3})).await;

        let ts: Vec<i64> = [
            sub_b.recv().await.unwrap(),
            sub_b.recv().await.unwrap(),
            sub_b.recv().await.unwrap(),
        ]
        .iter()
        .map(|r| r.ts())
        .collect();
        assert_eq!(ts, vec![1, 2, 3]);

        assert_eq!(relay.coordinator.hub().subscriber_count(), 1);
    }

    /// Numeric-string and numeric payloads produce identical samples when
    /// the producer supplies the timestamp.
    #[tokio::test]
    async fn test_coercion_identical_records() {
        let relay = relay();

        post(&relay.app, "/ingest/1", json!({"pitch": "12.5", "ts": 7})).await;
        let (_, from_string) = get(&relay.app, "/latest/1").await;

        post(&relay.app, "/ingest/1", json!({"pitch": 12.5, "ts": 7})).await;
        let (_, from_number) = get(&relay.app, "/latest/1").await;

        assert_eq!(from_string, from_number);
    }

    /// The analysis window endpoint merges both sources by timestamp and
    /// excludes events.
    #[tokio::test]
    async fn test_window_endpoint_merged() {
        let relay = relay();

        post(&relay.app, "/ingest/1", json!({"pitch": 1, "ts": 100})).await;
        post(&relay.app, "/ingest/2", json!({"pitch": 2, "ts": 50})).await;
        post(&relay.app, "/ingest/1", json!({"event": "calibrate", "ts": 60})).await;
        post(&relay.app, "/ingest/2", json!({"pitch": 3, "ts": 150})).await;

        let (status, body) = get(&relay.app, "/window?source=both&size=10").await;
        assert_eq!(status, StatusCode::OK);
        let ts: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["ts"].as_i64().unwrap())
            .collect();
        assert_eq!(ts, vec![50, 100, 150]);
    }

    /// Config loading feeds a working relay end to end.
    #[tokio::test]
    async fn test_config_driven_assembly() {
        let log_dir = TempDir::new().unwrap();
        let toml = format!(
            "[server]\nbind = \"127.0.0.1:0\"\n\n[relay]\nmax_buffer = 3\n\n[log]\ndir = \"{}\"\n",
            log_dir.path().display()
        );
        let blueprint =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();

        let store = Arc::new(RelayStore::new(blueprint.relay.max_buffer));
        let log = Arc::new(RecordLog::new(&blueprint.log).unwrap());
        let hub = Arc::new(BroadcastHub::new(Arc::clone(&store)));
        let coordinator = Arc::new(IngestCoordinator::new(store, log, hub));
        let app = server::create_router(RelayState {
            coordinator: Arc::clone(&coordinator),
            window: blueprint.relay.window,
        });

        for i in 0..4 {
            post(&app, "/ingest/1", json!({"pitch": i, "ts": i})).await;
        }

        // Capacity from the config file is honored
        let (_, history) = get(&app, "/history/1").await;
        assert_eq!(history.as_array().unwrap().len(), 3);

        coordinator.log().shutdown().await;
        let content = std::fs::read_to_string(log_dir.path().join("source-1.jsonl")).unwrap();
        // The log is append-only: eviction never rewrites it
        assert_eq!(content.lines().count(), 4);
    }
}
