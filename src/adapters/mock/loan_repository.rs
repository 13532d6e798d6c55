use crate::domain::{
    BookLoan,
    value_objects::{CopyId, Isbn, MemberId},
};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    /// Copies per ISBN, in registration order
    copies: HashMap<Isbn, Vec<CopyId>>,
    loans: Vec<BookLoan>,
}

impl State {
    fn has_active_loan(&self, copy_id: &CopyId) -> bool {
        self.loans
            .iter()
            .any(|loan| loan.is_outstanding() && &loan.copy_id == copy_id)
    }
}

/// In-memory implementation of LoanRepository
///
/// Holds the copy catalog and every loan behind a single mutex.
/// `try_create_loan` checks for an active loan and inserts under the same
/// guard, so at most one concurrent caller can claim a given copy.
pub struct LoanRepository {
    state: Mutex<State>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Register a physical copy of a title
    ///
    /// Registering the same copy twice is a no-op.
    pub fn add_copy(&self, isbn: Isbn, copy_id: CopyId) {
        let mut state = self.state.lock().unwrap();
        let copies = state.copies.entry(isbn).or_default();
        if !copies.contains(&copy_id) {
            copies.push(copy_id);
        }
    }

    /// Insert a loan as-is, bypassing the conflict check
    ///
    /// Used to seed existing (possibly overdue or returned) loans.
    pub fn insert_loan(&self, loan: BookLoan) {
        self.state.lock().unwrap().loans.push(loan);
    }

    /// Snapshot of every stored loan, in insertion order
    pub fn loans(&self) -> Vec<BookLoan> {
        self.state.lock().unwrap().loans.clone()
    }

    /// Number of active loans referencing the given copy
    pub fn active_loan_count_for_copy(&self, copy_id: &CopyId) -> usize {
        self.state
            .lock()
            .unwrap()
            .loans
            .iter()
            .filter(|loan| loan.is_outstanding() && &loan.copy_id == copy_id)
            .count()
    }
}

impl Default for LoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    /// Return unreturned loans of the member, in insertion order
    async fn get_outstanding_loans(&self, member_id: &MemberId) -> Result<Vec<BookLoan>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .loans
            .iter()
            .filter(|loan| loan.is_outstanding() && &loan.member_id == member_id)
            .cloned()
            .collect())
    }

    /// Return registered copies without an active loan, in registration order
    async fn get_available_copy_ids(&self, isbn: &Isbn) -> Result<Vec<CopyId>> {
        let state = self.state.lock().unwrap();
        let Some(copies) = state.copies.get(isbn) else {
            return Ok(Vec::new());
        };
        Ok(copies
            .iter()
            .filter(|copy_id| !state.has_active_loan(copy_id))
            .cloned()
            .collect())
    }

    /// Insert the loan unless the copy already has an active loan
    async fn try_create_loan(&self, loan: &BookLoan) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.has_active_loan(&loan.copy_id) {
            return Ok(false);
        }
        state.loans.push(loan.clone());
        Ok(true)
    }
}
