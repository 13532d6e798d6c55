use crate::application::checkout::{
    CheckoutApplicationError, CheckoutOutcome, ServiceDependencies,
    checkout_book as execute_checkout_book, schedule_due_date_reminder,
};
use crate::domain::MemberId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{CheckoutRequest, CheckoutResponse, LoanResponse},
};

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// POST /checkouts - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 会員の貸出数が上限（10冊）を超えないこと
/// - 会員に延滞中の貸出がないこと
/// - 貸出可能な複本があること
///
/// 貸出の作成後にリマインダーを予約する。予約の失敗は記録するだけで、
/// 作成済みの貸出は `201 Created` で返す。
pub async fn checkout_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let cmd = req.to_command(chrono::Utc::now())?;

    let loan = match execute_checkout_book(&state.service_deps, cmd).await? {
        CheckoutOutcome::CheckedOut(loan) => loan,
        CheckoutOutcome::TooManyOutstandingLoans => return Err(ApiError::TooManyOutstandingLoans),
        CheckoutOutcome::PastDueBooks => return Err(ApiError::PastDueBooks),
        CheckoutOutcome::NoCopiesAvailable => return Err(ApiError::NoCopiesAvailable),
    };

    let reminder_scheduled = match schedule_due_date_reminder(&state.service_deps, &loan).await {
        Ok(scheduled) => scheduled,
        Err(e) => {
            tracing::warn!(
                loan_id = %loan.loan_id.value(),
                error = ?e,
                "failed to schedule due date reminder"
            );
            false
        }
    };

    let response = CheckoutResponse {
        loan: LoanResponse::from(loan),
        reminder_scheduled,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /members/:member_id/loans - 会員の未返却の貸出一覧
pub async fn list_outstanding_loans(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<String>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let member_id = MemberId::new(member_id)?;

    let loans = state
        .service_deps
        .loan_repository
        .get_outstanding_loans(&member_id)
        .await
        .map_err(CheckoutApplicationError::LoanRepositoryError)?;

    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}
