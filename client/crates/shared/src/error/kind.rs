//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum used to group client-side failures.

use serde::Serialize;

/// エラー種別の列挙体
///
/// クライアント側で発生するエラーの分類を定義します。
/// 表示方法（インライン表示・トースト・モーダル）の判断に使用されます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::RateLimited;
/// assert_eq!(kind.as_str(), "Rate Limited");
/// assert!(kind.is_recoverable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// フィールド単位の入力エラー（ユーザーの修正で回復可能）
    Validation,
    /// 送信回数の上限超過（時間経過で回復可能）
    RateLimited,
    /// 送信コールバックの失敗
    Submission,
    /// 有効な期限切れ警告が存在しない
    SessionInactive,
    /// シグナルチャネルが閉じられた
    ChannelClosed,
    /// 設定値が不正
    Configuration,
    /// 想定外の内部エラー
    Internal,
}

impl ErrorKind {
    /// ユーザー向けの文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Validation.as_str(), "Validation");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation",
            ErrorKind::RateLimited => "Rate Limited",
            ErrorKind::Submission => "Submission",
            ErrorKind::SessionInactive => "Session Inactive",
            ErrorKind::ChannelClosed => "Channel Closed",
            ErrorKind::Configuration => "Configuration",
            ErrorKind::Internal => "Internal",
        }
    }

    /// ユーザー操作または時間経過で回復できるかどうか
    ///
    /// 回復可能なエラーはインラインで表示し、クラッシュさせません。
    #[inline]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Validation
                | ErrorKind::RateLimited
                | ErrorKind::Submission
                | ErrorKind::SessionInactive
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
