use crate::domain::{
    BookLoan,
    value_objects::{CopyId, Isbn, MemberId},
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出リポジトリポート
///
/// 貸出レコードの参照と条件付き作成を抽象化する。
/// 複本の取り合いの解決はすべてこのポートの `try_create_loan` に委ねる。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 会員の未返却の貸出をすべて取得する
    ///
    /// 貸出上限と延滞の確認に使用される。
    async fn get_outstanding_loans(&self, member_id: &MemberId) -> Result<Vec<BookLoan>>;

    /// ISBNに対して貸出可能と思われる複本IDを取得する
    ///
    /// 呼び出し時点のスナップショット。返した複本が実際に確保できるとは限らない。
    /// 順序は実装依存だが、1回の呼び出しの中では決定的であること。
    async fn get_available_copy_ids(&self, isbn: &Isbn) -> Result<Vec<CopyId>>;

    /// 貸出を条件付きで作成する
    ///
    /// 同じ `copy_id` の未返却の貸出が存在しない場合に限り作成し、`true` を返す。
    /// 存在する場合は何も書き込まずに `false` を返す。
    ///
    /// 判定と書き込みは、同じ複本を狙う並行呼び出しに対して不可分であること。
    /// 同じ複本への並行呼び出しのうち `true` を受け取るのは高々1つ。
    async fn try_create_loan(&self, loan: &BookLoan) -> Result<bool>;
}
