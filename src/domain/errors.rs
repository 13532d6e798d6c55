use std::fmt;
use thiserror::Error;

/// 識別子の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Member,
    Isbn,
    Copy,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Member => "member_id",
            IdentifierKind::Isbn => "isbn",
            IdentifierKind::Copy => "copy_id",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 識別子のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// 空文字列（空白のみを含む）
    #[error("{kind} must not be empty")]
    Empty { kind: IdentifierKind },
}

/// 貸出資格のエラー
///
/// 判定順序は固定（上限 → 延滞）。複数の違反が同時にある場合は先に判定した方を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityError {
    /// 貸出中の冊数が上限に達している
    TooManyOutstandingLoans,
    /// 返却期限を過ぎた未返却の貸出がある
    PastDueBooks,
}
