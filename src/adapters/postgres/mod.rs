pub mod loan_repository;

// パブリックに型を再エクスポート
pub use loan_repository::LoanRepository as PostgresLoanRepository;

/// Run the bundled schema migrations
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
