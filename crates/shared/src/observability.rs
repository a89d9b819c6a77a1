//! # ロギング初期化
//!
//! `tracing` の subscriber を組み立てる。
//!
//! | 環境変数 | 説明 |
//! |----------|------|
//! | `LOG_FORMAT` | `json`（本番向け）/ `pretty`（開発向け、デフォルト） |
//! | `RUST_LOG` | フィルタ。未設定なら [`DEFAULT_FILTER`] |
//!
//! `tracing_error::ErrorLayer` を登録するため、インフラ層エラーの SpanTrace は
//! このモジュールで初期化した後にだけ中身を持つ。

/// 出力形式を切り替える環境変数
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,todo=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する
    ///
    /// 大文字小文字は区別しない。不明な値は stderr に警告を出して `Pretty` にする
    /// （subscriber 初期化前なので tracing は使えない）。
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => Self::Json,
            None | Some("" | "pretty") => Self::Pretty,
            Some(other) => {
                eprintln!("{LOG_FORMAT_ENV}={other:?} は不明な値のため pretty で出力します");
                Self::Pretty
            }
        }
    }
}

/// subscriber の初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub service_name:   String,
    pub log_format:     LogFormat,
    pub default_filter: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }

    /// `LOG_FORMAT` を読んで設定を作る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let log_format = LogFormat::from_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref());
        Self::new(service_name, log_format)
    }

    /// `RUST_LOG` 未設定時のフィルタを差し替える
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

/// グローバル subscriber を登録する
///
/// 二重に呼び出した場合はエラーを返す。
#[cfg(feature = "observability")]
pub fn init_tracing(
    config: &TracingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let (json, pretty) = match config.log_format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false),
            ),
            None,
        ),
        LogFormat::Pretty => (None, Some(fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .with(tracing_error::ErrorLayer::default())
        .try_init()
}
