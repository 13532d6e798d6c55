use crate::domain::{BookLoan, value_objects::LoanId};
use crate::ports::reminder_notifier::{ReminderNotifier as ReminderNotifierTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// A reminder accepted by the mock notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub loan_id: LoanId,
    pub remind_at: DateTime<Utc>,
}

/// Mock implementation of ReminderNotifier
///
/// Does not deliver anything.
/// Records each scheduled reminder so callers can inspect them.
/// Can be switched to an unavailable mode to simulate delivery failures.
pub struct ReminderNotifier {
    scheduled: Mutex<Vec<ScheduledReminder>>,
    unavailable: Mutex<bool>,
}

impl ReminderNotifier {
    pub fn new() -> Self {
        Self {
            scheduled: Mutex::new(Vec::new()),
            unavailable: Mutex::new(false),
        }
    }

    /// Make every subsequent call fail
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    /// Reminders scheduled so far, in call order
    pub fn scheduled(&self) -> Vec<ScheduledReminder> {
        self.scheduled.lock().unwrap().clone()
    }
}

impl Default for ReminderNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReminderNotifierTrait for ReminderNotifier {
    /// Record a reminder at the loan's due date
    async fn schedule_due_date_reminder(&self, loan: &BookLoan) -> Result<()> {
        if *self.unavailable.lock().unwrap() {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "reminder service unavailable",
            )));
        }

        self.scheduled.lock().unwrap().push(ScheduledReminder {
            loan_id: loan.loan_id,
            remind_at: loan.due_date,
        });
        Ok(())
    }
}
