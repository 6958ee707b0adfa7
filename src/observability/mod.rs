//! 可观测性模块
//!
//! 提供结构化日志初始化、简单计数指标和健康检查端点。

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

// ===== Simple Metrics =====

/// 简单应用指标
#[derive(Debug, Default)]
pub struct AppMetrics {
    pub chat_requests_total: AtomicU64,
    pub mock_replies_total: AtomicU64,
    pub actions_extracted_total: AtomicU64,
    pub transactions_recorded_total: AtomicU64,
    pub llm_errors_total: AtomicU64,
}

impl AppMetrics {
    /// 记录一次聊天请求
    pub fn record_chat(&self, mock: bool) {
        self.chat_requests_total.fetch_add(1, Ordering::Relaxed);
        if mock {
            self.mock_replies_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 记录模型回复中解析出的动作
    pub fn record_action(&self) {
        self.actions_extracted_total.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录写入的交易
    pub fn record_transaction(&self) {
        self.transactions_recorded_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 记录模型调用失败
    pub fn record_llm_error(&self) {
        self.llm_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// 生成 Prometheus 文本格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP chat_requests_total Total chat requests
# TYPE chat_requests_total counter
chat_requests_total {}
# HELP mock_replies_total Chat requests answered in mock mode
# TYPE mock_replies_total counter
mock_replies_total {}
# HELP actions_extracted_total Structured actions extracted from model replies
# TYPE actions_extracted_total counter
actions_extracted_total {}
# HELP transactions_recorded_total Transactions recorded from chat actions
# TYPE transactions_recorded_total counter
transactions_recorded_total {}
# HELP llm_errors_total Failed completion calls
# TYPE llm_errors_total counter
llm_errors_total {}
"#,
            self.chat_requests_total.load(Ordering::Relaxed),
            self.mock_replies_total.load(Ordering::Relaxed),
            self.actions_extracted_total.load(Ordering::Relaxed),
            self.transactions_recorded_total.load(Ordering::Relaxed),
            self.llm_errors_total.load(Ordering::Relaxed),
        )
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    /// "configured" 或 "mock"
    pub llm_mode: String,
}

/// 可观测性状态
#[derive(Debug, Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub start_time: DateTime<Utc>,
    pub version: String,
    pub llm_mode: String,
}

impl ObservabilityState {
    pub fn new(version: impl Into<String>, llm_mode: impl Into<String>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            metrics,
            start_time: Utc::now(),
            version: version.into(),
            llm_mode: llm_mode.into(),
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// 根路径
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "FinTwin API is running",
        "status": "active",
    }))
}

/// 健康检查
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        llm_mode: state.llm_mode.clone(),
    })
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    state.metrics.gather()
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化日志
///
/// `RUST_LOG` 优先于配置中的级别。配置了 `log_dir` 时额外按天滚动写入 JSON
/// 日志文件，返回的 guard 需要在进程生命周期内持有。
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.level)));

    let stdout_layer = if config.structured {
        fmt::layer().json().with_current_span(false).boxed()
    } else {
        fmt::layer().with_target(true).with_line_number(true).boxed()
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "fintwin.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .with(filter)
        .try_init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::Request};
    use tower::ServiceExt;

    #[test]
    fn test_metrics_gather() {
        let metrics = AppMetrics::default();
        metrics.record_chat(true);
        metrics.record_chat(false);
        metrics.record_action();
        metrics.record_llm_error();

        let output = metrics.gather();
        assert!(output.contains("chat_requests_total 2"));
        assert!(output.contains("mock_replies_total 1"));
        assert!(output.contains("actions_extracted_total 1"));
        assert!(output.contains("transactions_recorded_total 0"));
        assert!(output.contains("llm_errors_total 1"));
    }

    #[tokio::test]
    async fn test_health_reports_llm_mode() {
        let state = Arc::new(ObservabilityState::new(
            "0.1.0",
            "mock",
            Arc::new(AppMetrics::default()),
        ));
        let app = create_observability_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["llm_mode"], "mock");
        assert_eq!(json["version"], "0.1.0");
    }

    #[tokio::test]
    async fn test_root_message() {
        let state = Arc::new(ObservabilityState::new(
            "0.1.0",
            "configured",
            Arc::new(AppMetrics::default()),
        ));
        let response = create_observability_router(state)
            .oneshot(Request::builder().uri("/").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "FinTwin API is running");
        assert_eq!(json["status"], "active");
    }
}
