use thiserror::Error;

/// 貸出手続きアプリケーション層のエラー
///
/// 基盤（リポジトリ・通知）の障害だけを表す。
/// 業務ルールによる拒否は `CheckoutOutcome` で返す。
#[derive(Debug, Error)]
pub enum CheckoutApplicationError {
    /// LoanRepositoryのエラー
    #[error("Loan repository error")]
    LoanRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ReminderNotifierのエラー
    #[error("Reminder notifier error")]
    ReminderNotifierError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CheckoutApplicationError>;
