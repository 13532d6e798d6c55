use library_checkout::{
    adapters::{
        mock::{
            loan_repository::LoanRepository as InMemoryLoanRepository,
            reminder_notifier::ReminderNotifier as MockReminderNotifier,
        },
        postgres::{PostgresLoanRepository, run_migrations},
    },
    api::{handlers::AppState, router::create_router},
    application::checkout::ServiceDependencies,
    config::AppConfig,
    ports::{LoanRepository, ReminderNotifier},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_checkout=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Initialize adapters
    let loan_repository: Arc<dyn LoanRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            run_migrations(&pool)
                .await
                .expect("Failed to run migrations");

            let repository = PostgresLoanRepository::new(pool);
            for (isbn, copy_id) in &config.seed_copies {
                repository
                    .add_copy(isbn, copy_id)
                    .await
                    .expect("Failed to register seed copy");
            }

            tracing::info!("Using PostgreSQL loan repository");
            Arc::new(repository)
        }
        None => {
            let repository = InMemoryLoanRepository::new();
            for (isbn, copy_id) in &config.seed_copies {
                repository.add_copy(isbn.clone(), copy_id.clone());
            }

            if config.seed_copies.is_empty() {
                tracing::warn!(
                    "DATABASE_URL is not set and SEED_COPIES is empty: \
                     the in-memory catalog has no copies, every checkout will be refused"
                );
            } else {
                tracing::warn!(
                    copies = config.seed_copies.len(),
                    "DATABASE_URL is not set, loans are kept in memory"
                );
            }
            Arc::new(repository)
        }
    };

    let reminder_notifier: Option<Arc<dyn ReminderNotifier>> = if config.reminders_enabled {
        Some(Arc::new(MockReminderNotifier::new()))
    } else {
        None
    };

    let service_deps = ServiceDependencies {
        loan_repository,
        reminder_notifier,
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
