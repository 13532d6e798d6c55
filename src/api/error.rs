use crate::application::checkout::CheckoutApplicationError;
use crate::domain::IdentifierError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// 貸出の拒否理由とアプリケーション層のエラーをHTTPレスポンスにマッピングする。
#[derive(Debug)]
pub enum ApiError {
    /// リクエストの識別子が不正
    InvalidRequest(IdentifierError),
    TooManyOutstandingLoans,
    PastDueBooks,
    NoCopiesAvailable,
    Application(CheckoutApplicationError),
}

impl From<IdentifierError> for ApiError {
    fn from(err: IdentifierError) -> Self {
        ApiError::InvalidRequest(err)
    }
}

impl From<CheckoutApplicationError> for ApiError {
    fn from(err: CheckoutApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 400 Bad Request - 入力の不備
            ApiError::InvalidRequest(ref err) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.to_string())
            }

            // 422 Unprocessable Entity - ビジネスルール違反（返却されるまで再試行不可）
            ApiError::TooManyOutstandingLoans => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "TOO_MANY_OUTSTANDING_LOANS",
                "Member has reached the maximum number of outstanding loans".to_string(),
            ),
            ApiError::PastDueBooks => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PAST_DUE_BOOKS",
                "Member has past due books and cannot borrow more".to_string(),
            ),

            // 409 Conflict - 在庫切れまたは競合負け（後で再試行可）
            ApiError::NoCopiesAvailable => (
                StatusCode::CONFLICT,
                "NO_COPIES_AVAILABLE",
                "No copies of this book are available".to_string(),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Application(CheckoutApplicationError::LoanRepositoryError(ref e)) => {
                tracing::error!("Loan repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LOAN_REPOSITORY_ERROR",
                    "Failed to access loan records".to_string(),
                )
            }
            ApiError::Application(CheckoutApplicationError::ReminderNotifierError(ref e)) => {
                tracing::error!("Reminder notifier error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REMINDER_NOTIFIER_ERROR",
                    "Failed to schedule reminder".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
