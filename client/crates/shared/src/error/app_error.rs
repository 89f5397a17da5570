//! Application Error - Unified error type for the client
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

type Source = Box<dyn Error + Send + Sync + 'static>;

/// アプリケーション統一エラー型
///
/// 各クレートのエラー（`FormError`, `SessionError`）は `to_app_error()` で
/// この型に変換され、表示層はこの型だけを扱います。
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::RateLimited, "Too many attempts")
///     .with_action("Wait a minute before trying again");
/// assert_eq!(err.action(), Some("Wait a minute before trying again"));
/// ```
pub struct AppError {
    kind: ErrorKind,
    /// ユーザー向けメッセージ
    message: Cow<'static, str>,
    /// ユーザーが取るべきアクション
    action: Option<Cow<'static, str>>,
    /// 元のエラー（デバッグ用）
    source: Option<Source>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            source: None,
        }
    }

    /// ユーザー向けアクションを設定
    #[inline]
    pub fn with_action(self, action: impl Into<Cow<'static, str>>) -> Self {
        Self {
            action: Some(action.into()),
            ..self
        }
    }

    /// 元のエラーを設定（デバッグ用）
    #[inline]
    pub fn with_source(self, source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// 回復可能かどうか（[`ErrorKind::is_recoverable`] を参照）
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("action", &self.action)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Some(action) => write!(f, "{}: {} ({action})", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::Submission, "Could not save");
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert_eq!(err.message(), "Could not save");
        assert!(err.action().is_none());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = AppError::new(ErrorKind::Submission, "Network down");
        assert_eq!(err.to_string(), "Submission: Network down");

        let err = AppError::new(ErrorKind::RateLimited, "Too many attempts")
            .with_action("Wait a minute");
        assert_eq!(err.to_string(), "Rate Limited: Too many attempts (Wait a minute)");
    }

    #[test]
    fn test_with_source() {
        let parse_err = "abc".parse::<u64>().unwrap_err();
        let err = AppError::new(ErrorKind::Configuration, "Invalid number").with_source(parse_err);
        assert!(err.source().is_some());
        assert!(!err.is_recoverable());
    }
}
