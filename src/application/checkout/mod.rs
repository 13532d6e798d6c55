mod checkout_service;
mod errors;

pub use checkout_service::{
    CheckoutOutcome, ServiceDependencies, checkout_book, schedule_due_date_reminder,
};
pub use errors::{CheckoutApplicationError, Result};
