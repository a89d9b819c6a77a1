//! # ミドルウェア
//!
//! ToDo Service 用のミドルウェアを提供する。

mod route_log;

pub use route_log::{RouteLogLayer, RouteLogService};
