//! # ToDo Service
//!
//! ToDo の CRUD を提供する HTTP サービス。
//!
//! ## モジュール構成
//!
//! - [`config`] - 設定ファイルの読み込み
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - ルートログ
//! - [`app_builder`] - ルーター構築
//! - [`server`] - 起動とグレースフルシャットダウン
//! - [`error`] / [`response`] - エラーと JSON レスポンス

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod response;
pub mod server;
