use crate::domain::{
    BookLoan,
    value_objects::{CopyId, Isbn, LoanId, MemberId},
};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use futures::stream::{StreamExt, TryStreamExt};
use sqlx::{PgPool, Row, postgres::PgRow};

/// Convert a `book_loans` row into a BookLoan
///
/// Identifier columns are re-validated, so a blank value stored by another
/// writer surfaces as an error instead of an invalid domain value.
fn map_row_to_book_loan(row: &PgRow) -> Result<BookLoan> {
    Ok(BookLoan {
        loan_id: LoanId::from_uuid(row.try_get("loan_id")?),
        member_id: MemberId::new(row.try_get::<String, _>("member_id")?)?,
        isbn: Isbn::new(row.try_get::<String, _>("isbn")?)?,
        copy_id: CopyId::new(row.try_get::<String, _>("copy_id")?)?,
        checked_out_at: row.try_get("checked_out_at")?,
        due_date: row.try_get("due_date")?,
        was_returned: row.try_get("was_returned")?,
    })
}

/// PostgreSQL implementation of LoanRepository
///
/// The partial unique index `uq_book_loans_active_copy` (one unreturned loan
/// per copy) is what makes `try_create_loan` atomic across connections.
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// Create a new LoanRepository with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a physical copy of a title
    ///
    /// Existing copies are left untouched.
    pub async fn add_copy(&self, isbn: &Isbn, copy_id: &CopyId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO book_copies (copy_id, isbn)
            VALUES ($1, $2)
            ON CONFLICT (copy_id) DO NOTHING
            "#,
        )
        .bind(copy_id.as_str())
        .bind(isbn.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    /// Fetch unreturned loans of a member
    ///
    /// Served by the partial index `idx_book_loans_active_member`.
    async fn get_outstanding_loans(&self, member_id: &MemberId) -> Result<Vec<BookLoan>> {
        let rows = sqlx::query(
            r#"
            SELECT
                loan_id,
                member_id,
                isbn,
                copy_id,
                checked_out_at,
                due_date,
                was_returned
            FROM book_loans
            WHERE member_id = $1 AND NOT was_returned
            ORDER BY due_date ASC
            "#,
        )
        .bind(member_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book_loan).collect()
    }

    /// Fetch copies of a title that have no unreturned loan
    ///
    /// Ordered by copy_id so the order is stable across calls.
    async fn get_available_copy_ids(&self, isbn: &Isbn) -> Result<Vec<CopyId>> {
        sqlx::query(
            r#"
            SELECT c.copy_id
            FROM book_copies c
            WHERE c.isbn = $1
              AND NOT EXISTS (
                  SELECT 1
                  FROM book_loans l
                  WHERE l.copy_id = c.copy_id AND NOT l.was_returned
              )
            ORDER BY c.copy_id ASC
            "#,
        )
        .bind(isbn.as_str())
        .fetch(&self.pool)
        .map(|row_result: std::result::Result<PgRow, sqlx::Error>| -> Result<CopyId> {
            let row = row_result?;
            Ok(CopyId::new(row.try_get::<String, _>("copy_id")?)?)
        })
        .try_collect()
        .await
    }

    /// Insert the loan unless the copy already has an unreturned loan
    ///
    /// `ON CONFLICT ... DO NOTHING` against the partial unique index turns a
    /// lost race into zero affected rows instead of a constraint error.
    async fn try_create_loan(&self, loan: &BookLoan) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO book_loans (
                loan_id,
                member_id,
                isbn,
                copy_id,
                checked_out_at,
                due_date,
                was_returned
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (copy_id) WHERE NOT was_returned
            DO NOTHING
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.member_id.as_str())
        .bind(loan.isbn.as_str())
        .bind(loan.copy_id.as_str())
        .bind(loan.checked_out_at)
        .bind(loan.due_date)
        .bind(loan.was_returned)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
