use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::{IdentifierError, IdentifierKind};

/// 貸出ID - 貸出レコード自体の識別子
///
/// リポジトリ上の行を識別するためだけに使う。
/// 複本の競合判定には使わない（競合判定はCopyId単位）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

/// 空白だけの文字列を拒否する。値そのものは書き換えない
fn non_empty(kind: IdentifierKind, raw: impl Into<String>) -> Result<String, IdentifierError> {
    let raw = raw.into();
    if raw.trim().is_empty() {
        return Err(IdentifierError::Empty { kind });
    }
    Ok(raw)
}

/// 文字列ベースの識別子を定義する
///
/// 会員管理・カタログ管理の各コンテキストが発行する識別子は
/// 貸出コンテキストにとって不透明な文字列であり、空でないことだけを保証する。
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
                non_empty($kind, raw).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_identifier!(
    /// 会員ID - 会員管理コンテキストへの参照
    MemberId,
    IdentifierKind::Member
);

string_identifier!(
    /// ISBN - カタログ管理コンテキストの書籍タイトルへの参照
    ///
    /// チェックディジットの検証はカタログ側の責務なので行わない。
    Isbn,
    IdentifierKind::Isbn
);

string_identifier!(
    /// 複本ID - 物理的な1冊を識別する
    CopyId,
    IdentifierKind::Copy
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_id_creation() {
        let id1 = LoanId::new();
        let id2 = LoanId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_loan_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = LoanId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_member_id_accepts_non_empty() {
        let id = MemberId::new("member-42").unwrap();
        assert_eq!(id.as_str(), "member-42");
    }

    #[test]
    fn test_identifier_is_kept_verbatim() {
        let isbn = Isbn::new("  978-4-00-000000-0 ").unwrap();
        assert_eq!(isbn.as_str(), "  978-4-00-000000-0 ");

        // 不透明な文字列なので、空白の違いも別の会員になる
        assert_ne!(MemberId::new(" M").unwrap(), MemberId::new("M").unwrap());
    }

    #[test]
    fn test_empty_identifiers_are_rejected() {
        assert_eq!(
            MemberId::new("").unwrap_err(),
            IdentifierError::Empty {
                kind: IdentifierKind::Member
            }
        );
        assert_eq!(
            Isbn::new("   ").unwrap_err(),
            IdentifierError::Empty {
                kind: IdentifierKind::Isbn
            }
        );
        assert_eq!(
            CopyId::new("\t").unwrap_err(),
            IdentifierError::Empty {
                kind: IdentifierKind::Copy
            }
        );
    }

    #[test]
    fn test_identifier_deserialization_validates() {
        let ok: CopyId = serde_json::from_str("\"C1\"").unwrap();
        assert_eq!(ok, CopyId::new("C1").unwrap());

        let err = serde_json::from_str::<CopyId>("\"\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_copy_ids_order_lexicographically() {
        let mut ids = vec![
            CopyId::new("C2").unwrap(),
            CopyId::new("C10").unwrap(),
            CopyId::new("C1").unwrap(),
        ];
        ids.sort();
        let ids: Vec<&str> = ids.iter().map(CopyId::as_str).collect();
        assert_eq!(ids, vec!["C1", "C10", "C2"]);
    }
}
