use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Isbn, MemberId};

/// コマンド：書籍を貸し出す
///
/// `requested_at` は判定の基準となる「現在時刻」。
/// 延滞判定と返却期限の計算の両方がこの1つの時刻を使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutBook {
    pub member_id: MemberId,
    pub isbn: Isbn,
    pub requested_at: DateTime<Utc>,
}
