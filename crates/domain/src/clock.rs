//! # Clock（時刻プロバイダ）
//!
//! ToDo の `created` / `updated` を打刻する時刻の供給元。
//! リポジトリは `Utc::now()` を直接呼ばず、このトレイト経由で現在時刻を得る。

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// システム時刻（UTC）を返す実装
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 手動で進められる固定時刻の実装
///
/// 作成と更新の間で時刻を進め、`updated` のみが変化することを検証する用途。
#[derive(Debug)]
pub struct FixedClock {
   now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: Mutex::new(now),
      }
   }

   /// 時刻を `delta` だけ進める
   pub fn advance(&self, delta: Duration) {
      let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
      *now += delta;
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      *self.now.lock().unwrap_or_else(|e| e.into_inner())
   }
}
