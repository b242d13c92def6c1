//! Loan ledger
//!
//! Holds the active loans, at most one per book. The ledger trusts its
//! caller to have checked that a book is free before recording a loan.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::entities::{BookId, Loan, MemberId};

#[derive(Debug, Default)]
pub struct LoanLedger {
    active: BTreeMap<BookId, Loan>,
}

impl LoanLedger {
    /// Record a new active loan
    pub fn record_loan(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
        borrow_date: NaiveDate,
    ) -> Loan {
        let loan = Loan::open(book_id, member_id, borrow_date);
        self.active.insert(loan.book_id.clone(), loan.clone());
        loan
    }

    /// Stamp the return date and drop the loan from the active set
    pub fn close_loan(&mut self, book_id: &BookId, return_date: NaiveDate) -> Option<Loan> {
        self.active
            .remove(book_id)
            .map(|loan| loan.close(return_date))
    }

    pub fn find_active_loan(&self, book_id: &BookId) -> Option<&Loan> {
        self.active.get(book_id)
    }

    pub fn list_active_loans(&self) -> Vec<Loan> {
        self.active.values().cloned().collect()
    }
}
