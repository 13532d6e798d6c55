pub mod loan_repository;
pub mod reminder_notifier;

pub use loan_repository::LoanRepository;
pub use reminder_notifier::{ReminderNotifier, ScheduledReminder};
