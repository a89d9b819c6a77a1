//! # ページ指定
//!
//! 一覧取得の `start` / `count` を正規化する値オブジェクト。
//!
//! 範囲外の値はエラーにせず既定値に丸める:
//!
//! | 入力 | 正規化後 |
//! |------|---------|
//! | `count` が 1〜10 | そのまま |
//! | `count` がそれ以外（0、負数、11 以上） | 10 |
//! | `start` が負数 | 0 |

/// 1 ページあたりの最大件数（兼 既定値）
pub const MAX_PAGE_SIZE: i64 = 10;

/// 正規化済みのページ指定
///
/// # 不変条件
///
/// - `1 <= count <= MAX_PAGE_SIZE`
/// - `start >= 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    start: i64,
    count: i64,
}

impl PageRequest {
    /// 生の `start` / `count` から正規化したページ指定を作る
    pub fn new(start: i64, count: i64) -> Self {
        let count = if (1..=MAX_PAGE_SIZE).contains(&count) {
            count
        } else {
            MAX_PAGE_SIZE
        };
        Self {
            start: start.max(0),
            count,
        }
    }

    /// 先頭からのオフセット
    pub fn start(&self) -> i64 {
        self.start
    }

    /// 取得する最大件数
    pub fn count(&self) -> i64 {
        self.count
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1)]
    #[case(5)]
    #[case(10)]
    fn test_範囲内のcountはそのまま使われる(#[case] count: i64) {
        assert_eq!(PageRequest::new(0, count).count(), count);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[case(11)]
    #[case(1000)]
    #[case(i64::MIN)]
    #[case(i64::MAX)]
    fn test_範囲外のcountは10に丸められる(#[case] count: i64) {
        assert_eq!(PageRequest::new(0, count), PageRequest::new(0, 10));
    }

    #[rstest]
    #[case(-1)]
    #[case(-100)]
    #[case(i64::MIN)]
    fn test_負のstartは0に丸められる(#[case] start: i64) {
        assert_eq!(PageRequest::new(start, 3), PageRequest::new(0, 3));
    }

    #[test]
    fn test_正のstartはそのまま使われる() {
        assert_eq!(PageRequest::new(25, 3).start(), 25);
    }

    #[test]
    fn test_defaultは先頭から10件() {
        let sut = PageRequest::default();

        assert_eq!(sut.start(), 0);
        assert_eq!(sut.count(), 10);
    }
}
