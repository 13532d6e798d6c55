use crate::domain::BookLoan;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 返却期限リマインダーポート
///
/// 通知の配信手段（メール、プッシュ通知など）は実装側の責務。
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    /// 貸出の返却期限に合わせてリマインダーを予約する
    async fn schedule_due_date_reminder(&self, loan: &BookLoan) -> Result<()>;
}
