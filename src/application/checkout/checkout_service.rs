use crate::domain::{self, BookLoan, EligibilityError, commands::CheckoutBook};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{CheckoutApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞いは持たず、純粋な関数に依存関係を渡す。
///
/// `reminder_notifier` は任意。貸出の判定には使わない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub loan_repository: Arc<dyn LoanRepository>,
    pub reminder_notifier: Option<Arc<dyn ReminderNotifier>>,
}

/// 貸出手続きの結果
///
/// 業務上の終端状態をすべて列挙する。呼び出し側は `match` で網羅的に分岐できる。
/// リポジトリ障害などの基盤エラーはここに含めず、`Err` で返す。
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// 複本を確保し、貸出を作成した
    CheckedOut(BookLoan),
    /// 貸出中の冊数が上限に達している（返却されるまで再試行不可）
    TooManyOutstandingLoans,
    /// 延滞中の貸出がある（返却されるまで再試行不可）
    PastDueBooks,
    /// 貸出可能な複本がない、またはすべての複本を他の要求に先取りされた
    ///
    /// 一時的な偽陰性でありうるので、呼び出し側は後で再試行してよい。
    NoCopiesAvailable,
}

impl CheckoutOutcome {
    /// 作成された貸出（成功時のみ）
    pub fn loan(&self) -> Option<&BookLoan> {
        match self {
            CheckoutOutcome::CheckedOut(loan) => Some(loan),
            _ => None,
        }
    }

    /// 呼び出し側が後で再試行してよい結果か
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutOutcome::NoCopiesAvailable)
    }
}

impl From<EligibilityError> for CheckoutOutcome {
    fn from(err: EligibilityError) -> Self {
        match err {
            EligibilityError::TooManyOutstandingLoans => CheckoutOutcome::TooManyOutstandingLoans,
            EligibilityError::PastDueBooks => CheckoutOutcome::PastDueBooks,
        }
    }
}

/// 書籍を貸し出す（純粋な関数）
///
/// ビジネスルール（この順序で判定）：
/// 1. 会員の未返却の貸出が上限（10冊）未満であること
/// 2. 会員に返却期限を過ぎた貸出がないこと
/// 3. ISBNに貸出可能な複本があること
///
/// # 並行性
///
/// プロセス内のロックは使わない。複本の取り合いはリポジトリの
/// 条件付き作成（`try_create_loan`）だけで解決する。
/// 候補の複本を順に試し、最初に確保できた複本で貸出を作成する。
/// 候補をすべて先取りされた場合は `NoCopiesAvailable` を返す。
/// 待機や再照会は行わない。
///
/// # 副作用
///
/// 成功時のみ、貸出が1件作成される。拒否された場合は何も書き込まない。
///
/// # エラー
/// - LoanRepositoryError: リポジトリの障害（原因はそのまま保持される）
pub async fn checkout_book(
    deps: &ServiceDependencies,
    cmd: CheckoutBook,
) -> Result<CheckoutOutcome> {
    // 1. 会員の未返却の貸出を取得
    let outstanding = deps
        .loan_repository
        .get_outstanding_loans(&cmd.member_id)
        .await
        .map_err(CheckoutApplicationError::LoanRepositoryError)?;

    // 2. 上限・延滞の確認
    if let Err(rejection) = domain::loan::check_eligibility(&outstanding, cmd.requested_at) {
        tracing::debug!(
            member_id = %cmd.member_id,
            outstanding = outstanding.len(),
            ?rejection,
            "checkout rejected"
        );
        return Ok(rejection.into());
    }

    // 3. 候補の複本を取得
    let candidates = deps
        .loan_repository
        .get_available_copy_ids(&cmd.isbn)
        .await
        .map_err(CheckoutApplicationError::LoanRepositoryError)?;

    if candidates.is_empty() {
        tracing::debug!(isbn = %cmd.isbn, "no copies available");
        return Ok(CheckoutOutcome::NoCopiesAvailable);
    }

    // 4. 候補を順に確保
    for copy_id in candidates {
        let loan = domain::loan::new_loan(
            cmd.member_id.clone(),
            cmd.isbn.clone(),
            copy_id,
            cmd.requested_at,
        );

        let created = deps
            .loan_repository
            .try_create_loan(&loan)
            .await
            .map_err(CheckoutApplicationError::LoanRepositoryError)?;

        if created {
            tracing::info!(
                member_id = %loan.member_id,
                isbn = %loan.isbn,
                copy_id = %loan.copy_id,
                due_date = %loan.due_date,
                "book checked out"
            );
            return Ok(CheckoutOutcome::CheckedOut(loan));
        }

        tracing::debug!(copy_id = %loan.copy_id, "copy already claimed, trying next candidate");
    }

    tracing::debug!(isbn = %cmd.isbn, "all candidate copies were claimed concurrently");
    Ok(CheckoutOutcome::NoCopiesAvailable)
}

/// 返却期限のリマインダーを予約する
///
/// 通知ポートが設定されていない場合は何もしない。
/// `checkout_book` の判定とは独立している。
pub async fn schedule_due_date_reminder(
    deps: &ServiceDependencies,
    loan: &BookLoan,
) -> Result<bool> {
    let Some(notifier) = &deps.reminder_notifier else {
        return Ok(false);
    };

    notifier
        .schedule_due_date_reminder(loan)
        .await
        .map_err(CheckoutApplicationError::ReminderNotifierError)?;

    Ok(true)
}
