use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CopyId, EligibilityError, Isbn, LoanId, MemberId};

/// 貸出期間（日数）
pub const LOAN_DURATION_DAYS: i64 = 14;

/// 会員1人あたりの最大貸出冊数（未返却）
pub const MAX_OUTSTANDING_LOANS: usize = 10;

/// 貸出レコード - 1冊の複本の1回の貸出
///
/// 不変条件：
/// - 1つの複本（copy_id）に対して未返却の貸出は同時に1件まで
/// - 作成時は `was_returned = false`
///
/// 返却（`was_returned` を true にする）は別のワークフローの責務。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLoan {
    pub loan_id: LoanId,
    pub member_id: MemberId,
    pub isbn: Isbn,
    pub copy_id: CopyId,
    pub checked_out_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub was_returned: bool,
}

impl BookLoan {
    /// 未返却か
    pub fn is_outstanding(&self) -> bool {
        !self.was_returned
    }

    /// 延滞しているか
    ///
    /// 返却期限は日付単位で計算されるが、比較は時刻まで含めて行う。
    /// 期限ちょうどの時刻も延滞として扱う。
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.is_outstanding() && self.due_date <= now
    }
}

/// 純粋関数：返却期限を計算する
///
/// 貸出時刻の日付（UTC）の0時 + 14日。時刻部分は切り捨てる。
pub fn due_date_for(checked_out_at: DateTime<Utc>) -> DateTime<Utc> {
    let start_of_day = checked_out_at
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();
    start_of_day + Duration::days(LOAN_DURATION_DAYS)
}

/// 純粋関数：貸出資格を判定する
///
/// ビジネスルール（この順序で判定）：
/// 1. 新しい1冊を加えて上限（10冊）を超えないこと
/// 2. 返却期限を過ぎた未返却の貸出がないこと
///
/// `outstanding` は会員の未返却の貸出。
pub fn check_eligibility(
    outstanding: &[BookLoan],
    now: DateTime<Utc>,
) -> Result<(), EligibilityError> {
    if outstanding.len() + 1 > MAX_OUTSTANDING_LOANS {
        return Err(EligibilityError::TooManyOutstandingLoans);
    }

    if outstanding.iter().any(|loan| loan.is_past_due(now)) {
        return Err(EligibilityError::PastDueBooks);
    }

    Ok(())
}

/// 純粋関数：複本に対する新しい貸出を作る
///
/// 副作用なし。リポジトリへの登録（条件付き作成）は呼び出し側が行う。
pub fn new_loan(
    member_id: MemberId,
    isbn: Isbn,
    copy_id: CopyId,
    checked_out_at: DateTime<Utc>,
) -> BookLoan {
    BookLoan {
        loan_id: LoanId::new(),
        member_id,
        isbn,
        copy_id,
        checked_out_at,
        due_date: due_date_for(checked_out_at),
        was_returned: false,
    }
}
