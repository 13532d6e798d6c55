use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, NaiveTime, Utc};
use library_checkout::adapters::mock::{LoanRepository, ReminderNotifier};
use library_checkout::api::handlers::AppState;
use library_checkout::api::router::create_router;
use library_checkout::api::types::*;
use library_checkout::application::checkout::ServiceDependencies;
use library_checkout::domain::loan::{LOAN_DURATION_DAYS, MAX_OUTSTANDING_LOANS};
use library_checkout::domain::*;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// APIテスト用のヘルパー関数
// ============================================================================

/// インメモリのアダプターでアプリケーションをセットアップ
fn setup_app(
    loan_repository: Arc<LoanRepository>,
    reminder_notifier: Option<Arc<ReminderNotifier>>,
) -> axum::Router {
    let service_deps = ServiceDependencies {
        loan_repository,
        reminder_notifier: reminder_notifier
            .map(|n| n as Arc<dyn library_checkout::ports::ReminderNotifier>),
    };

    create_router(Arc::new(AppState { service_deps }))
}

fn checkout_request(member_id: &str, isbn: &str) -> Request<Body> {
    let body = json!({ "member_id": member_id, "isbn": isbn });
    Request::builder()
        .method("POST")
        .uri("/checkouts")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn seed_loan(repo: &LoanRepository, member_id: &str, copy_id: &str, due_in: Duration) {
    let due_date = Utc::now() + due_in;
    repo.insert_loan(BookLoan {
        loan_id: LoanId::new(),
        member_id: MemberId::new(member_id).unwrap(),
        isbn: Isbn::new("SEED").unwrap(),
        copy_id: CopyId::new(copy_id).unwrap(),
        checked_out_at: due_date - Duration::days(LOAN_DURATION_DAYS),
        due_date,
        was_returned: false,
    });
}

fn repo_with_copies(isbn: &str, copies: &[&str]) -> Arc<LoanRepository> {
    let repo = Arc::new(LoanRepository::new());
    for copy_id in copies {
        repo.add_copy(Isbn::new(isbn).unwrap(), CopyId::new(*copy_id).unwrap());
    }
    repo
}

// ============================================================================
// 正常系
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = setup_app(Arc::new(LoanRepository::new()), None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_checkout_creates_loan_and_schedules_reminder() {
    // Arrange
    let repo = repo_with_copies("X", &["C1", "C2"]);
    let notifier = Arc::new(ReminderNotifier::new());
    let app = setup_app(repo.clone(), Some(notifier.clone()));

    // Act
    let response = app.oneshot(checkout_request("M", "X")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: CheckoutResponse = read_json(response).await;
    assert_eq!(body.loan.member_id, "M");
    assert_eq!(body.loan.isbn, "X");
    assert_eq!(body.loan.copy_id, "C1");
    assert!(!body.loan.was_returned);
    assert!(body.reminder_scheduled);

    // 返却期限は日付単位（0時）
    assert_eq!(body.loan.due_date.time(), NaiveTime::MIN);
    assert_eq!(
        body.loan.due_date.date_naive(),
        body.loan.checked_out_at.date_naive() + Duration::days(LOAN_DURATION_DAYS)
    );

    assert_eq!(repo.loans().len(), 1);
    assert_eq!(notifier.scheduled().len(), 1);
    assert_eq!(notifier.scheduled()[0].loan_id.value(), body.loan.loan_id);
}

#[tokio::test]
async fn test_checkout_succeeds_when_reminder_fails() {
    let repo = repo_with_copies("X", &["C1"]);
    let notifier = Arc::new(ReminderNotifier::new());
    notifier.set_unavailable(true);
    let app = setup_app(repo.clone(), Some(notifier));

    let response = app.oneshot(checkout_request("M", "X")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: CheckoutResponse = read_json(response).await;
    assert!(!body.reminder_scheduled);
    assert_eq!(repo.loans().len(), 1);
}

#[tokio::test]
async fn test_list_outstanding_loans() {
    let repo = repo_with_copies("X", &["C1"]);
    seed_loan(&repo, "M", "S1", Duration::days(3));
    seed_loan(&repo, "OTHER", "S2", Duration::days(3));
    let app = setup_app(repo, None);

    let response = app
        .clone()
        .oneshot(checkout_request("M", "X"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/members/M/loans")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let loans: Vec<LoanResponse> = read_json(response).await;
    assert_eq!(loans.len(), 2);
    assert!(loans.iter().all(|l| l.member_id == "M"));
    let mut copies: Vec<&str> = loans.iter().map(|l| l.copy_id.as_str()).collect();
    copies.sort();
    assert_eq!(copies, vec!["C1", "S1"]);
}

// ============================================================================
// 異常系
// ============================================================================

#[tokio::test]
async fn test_checkout_rejects_blank_identifiers() {
    let repo = repo_with_copies("X", &["C1"]);
    let app = setup_app(repo.clone(), None);

    let response = app.oneshot(checkout_request("  ", "X")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = read_json(response).await;
    assert_eq!(body.error, "INVALID_REQUEST");
    assert_eq!(body.message, "member_id must not be empty");
    assert!(repo.loans().is_empty());
}

#[tokio::test]
async fn test_checkout_at_limit_returns_unprocessable() {
    let repo = repo_with_copies("X", &["C1"]);
    for i in 0..MAX_OUTSTANDING_LOANS {
        seed_loan(&repo, "M", &format!("S{}", i), Duration::days(3));
    }
    let app = setup_app(repo.clone(), None);

    let response = app.oneshot(checkout_request("M", "X")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = read_json(response).await;
    assert_eq!(body.error, "TOO_MANY_OUTSTANDING_LOANS");
    assert_eq!(repo.loans().len(), MAX_OUTSTANDING_LOANS);
}

#[tokio::test]
async fn test_checkout_with_past_due_books_returns_unprocessable() {
    let repo = repo_with_copies("X", &["C1"]);
    seed_loan(&repo, "M", "S1", -Duration::days(1));
    let app = setup_app(repo.clone(), None);

    let response = app.oneshot(checkout_request("M", "X")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = read_json(response).await;
    assert_eq!(body.error, "PAST_DUE_BOOKS");
    assert_eq!(repo.loans().len(), 1);
}

#[tokio::test]
async fn test_checkout_without_copies_returns_conflict() {
    let repo = repo_with_copies("X", &["C1"]);
    let app = setup_app(repo, None);

    let response = app
        .clone()
        .oneshot(checkout_request("A", "X"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(checkout_request("B", "X")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = read_json(response).await;
    assert_eq!(body.error, "NO_COPIES_AVAILABLE");
}
