//! Failure injection tests against live mock backends.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use serde_json::Value;
use weather_resilience::config::{ExecutionMode, ResilienceConfig};
use weather_resilience::http::ApiClient;
use weather_resilience::resilience::{ClassifiedError, ErrorCode, EventKind, Severity};
use weather_resilience::{ErrorContext, RawFailure, ResilientExecutor};

mod common;

fn fast_config(base_url: &str) -> ResilienceConfig {
    let mut config = ResilienceConfig::default();
    config.api.base_url = base_url.to_string();
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config.timeouts.primary_ms = 2_000;
    config.timeouts.fallback_ms = 1_000;
    config.timeouts.probe_ms = 300;
    config
}

fn api(base_url: &str) -> ApiClient {
    ApiClient::new(reqwest::Client::new(), base_url.parse().unwrap(), Duration::from_secs(2))
}

#[tokio::test]
async fn test_retry_on_server_error() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let addr = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            let count = cc.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                (503, "{}".into())
            } else {
                (200, r#"{"temperature": 21}"#.into())
            }
        }
    })
    .await;

    let base_url = format!("http://{}", addr);
    let executor = ResilientExecutor::from_config(&fast_config(&base_url)).unwrap();
    let api = api(&base_url);

    let value: Value = executor
        .execute(|| api.get_json::<Value>("/api/weather/current"), ErrorContext::new().component("WeatherCard"))
        .await
        .expect("should eventually succeed after retries");

    assert_eq!(value["temperature"], 21);
    assert_eq!(call_count.load(Ordering::SeqCst), 3);

    let stats = executor.statistics();
    assert_eq!(stats.total_errors, 2);
    assert_eq!(stats.by_code[&ErrorCode::ServerError], 2);
    assert_eq!(executor.events()[0].kind, EventKind::Recovered { attempts: 3 });
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let addr = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (404, "no such location".into())
        }
    })
    .await;

    let base_url = format!("http://{}", addr);
    let executor = ResilientExecutor::from_config(&fast_config(&base_url)).unwrap();
    let api = api(&base_url);

    let err = executor
        .execute(|| api.get_json::<Value>("/api/locations/42"), ErrorContext::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.to_string(), "The requested information could not be found.");
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_backend_uses_fallback() {
    // Nothing listens on the discard port.
    let base_url = "http://127.0.0.1:9";
    let executor = ResilientExecutor::from_config(&fast_config(base_url)).unwrap();
    let api = api(base_url);

    let cached = serde_json::json!({ "alerts": [] });
    let expected = cached.clone();
    let value = executor
        .execute_with_fallback(
            || api.get_json::<Value>("/api/weather/alerts"),
            move || async move { Ok(cached) },
            ErrorContext::new().action("load_alerts"),
        )
        .await
        .unwrap();

    assert_eq!(value, expected);
    let stats = executor.statistics();
    assert_eq!(stats.total_errors, 3);
    assert_eq!(stats.by_code[&ErrorCode::NetworkError], 3);
    assert_eq!(stats.fallback_successes, 1);
}

#[tokio::test]
async fn test_rate_limit_exhausts_attempts() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let addr = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (429, "slow down".into())
        }
    })
    .await;

    let base_url = format!("http://{}", addr);
    let executor = ResilientExecutor::from_config(&fast_config(&base_url)).unwrap();
    let api = api(&base_url);

    let err = executor
        .execute(|| api.get_json::<Value>("/api/traffic"), ErrorContext::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::RateLimited);
    assert_eq!(err.severity, Severity::Medium);
    assert_eq!(call_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_connection_dropped_mid_body_is_retried() {
    let addr = common::start_truncating_backend(100, r#"{"temperature": 2"#).await;

    let base_url = format!("http://{}", addr);
    let executor = ResilientExecutor::from_config(&fast_config(&base_url)).unwrap();
    let api = api(&base_url);

    let err = executor
        .execute(|| api.get_json::<Value>("/api/weather/current"), ErrorContext::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::NetworkError);
    assert_eq!(executor.statistics().by_code[&ErrorCode::NetworkError], 3);
}

#[tokio::test]
async fn test_malformed_body_is_not_retried() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let addr = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (200, "not json".into())
        }
    })
    .await;

    let base_url = format!("http://{}", addr);
    let executor = ResilientExecutor::from_config(&fast_config(&base_url)).unwrap();
    let api = api(&base_url);

    let err = executor
        .execute(|| api.get_json::<Value>("/api/weather/current"), ErrorContext::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::UnknownError);
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_request_timeout_reports_its_limit() {
    let addr = common::start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        (200, "{}".into())
    })
    .await;

    let api = ApiClient::new(
        reqwest::Client::new(),
        format!("http://{}", addr).parse().unwrap(),
        Duration::from_millis(200),
    );
    let result = api.get_json::<Value>("/api/radar").await;

    assert_eq!(result, Err(RawFailure::Timeout { after_ms: 200 }));
}

#[tokio::test]
async fn test_critical_errors_reach_monitoring_in_production() {
    let mock = common::start_mock_api().await;
    let mut config = fast_config(&mock.base_url());
    config.mode = ExecutionMode::Production;
    config.api.client_id = Some("dashboard-test".to_string());
    let executor = ResilientExecutor::from_config(&config).unwrap();

    executor.report(
        ClassifiedError::new(ErrorCode::UnknownError, "alert feed corrupted", false, Severity::Critical),
        ErrorContext::new().component("AlertPanel").location(29.76, -95.37),
    );

    let reports = mock.wait_for_reports(1).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["error"]["code"], "UNKNOWN_ERROR");
    assert_eq!(reports[0]["error"]["severity"], "critical");
    assert_eq!(reports[0]["context"]["component"], "AlertPanel");
    assert_eq!(reports[0]["context"]["client_id"], "dashboard-test");
}

#[tokio::test]
async fn test_monitoring_failure_is_swallowed() {
    let base_url = "http://127.0.0.1:9";
    let mut config = fast_config(base_url);
    config.mode = ExecutionMode::Production;
    let executor = ResilientExecutor::from_config(&config).unwrap();

    executor.report(
        ClassifiedError::new(ErrorCode::UnknownError, "storage full", false, Severity::Critical),
        ErrorContext::new(),
    );
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(executor.statistics().total_errors, 1);
}
