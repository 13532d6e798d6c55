use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BookLoan, IdentifierError, Isbn, MemberId, commands::CheckoutBook};

/// 貸出リクエスト（POST /checkouts）
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub member_id: String,
    pub isbn: String,
}

impl CheckoutRequest {
    /// 識別子を検証してコマンドに変換する
    pub fn to_command(
        &self,
        requested_at: DateTime<Utc>,
    ) -> Result<CheckoutBook, IdentifierError> {
        Ok(CheckoutBook {
            member_id: MemberId::new(self.member_id.as_str())?,
            isbn: Isbn::new(self.isbn.as_str())?,
            requested_at,
        })
    }
}

/// 貸出レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub loan_id: Uuid,
    pub member_id: String,
    pub isbn: String,
    pub copy_id: String,
    pub checked_out_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub was_returned: bool,
}

impl From<BookLoan> for LoanResponse {
    fn from(loan: BookLoan) -> Self {
        Self {
            loan_id: loan.loan_id.value(),
            member_id: loan.member_id.into(),
            isbn: loan.isbn.into(),
            copy_id: loan.copy_id.into(),
            checked_out_at: loan.checked_out_at,
            due_date: loan.due_date,
            was_returned: loan.was_returned,
        }
    }
}

/// 貸出成功レスポンス（POST /checkouts）
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub loan: LoanResponse,
    /// 返却期限リマインダーを予約できたか
    pub reminder_scheduled: bool,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
