//! Loan domain entity
//!
//! Records that a member has borrowed a book. A loan is active while its
//! return date is unset; there is at most one active loan per book.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::book::BookId;
use super::member::MemberId;

/// A loan of one book to one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    /// Open a new active loan
    pub fn open(book_id: BookId, member_id: MemberId, borrow_date: NaiveDate) -> Self {
        Self {
            book_id,
            member_id,
            borrow_date,
            return_date: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    /// Close the loan, stamping the return date
    pub fn close(mut self, return_date: NaiveDate) -> Self {
        self.return_date = Some(return_date);
        self
    }
}

impl std::fmt::Display for Loan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} borrowed by {} on {}",
            self.book_id, self.member_id, self.borrow_date
        )?;
        if let Some(returned) = self.return_date {
            write!(f, ", returned {}", returned)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn open_loan_is_active() {
        let loan = Loan::open("B1".into(), "M1".into(), date(2026, 10, 1));
        assert!(loan.is_active());
        assert_eq!(loan.return_date, None);
    }

    #[test]
    fn closed_loan_is_not_active() {
        let loan = Loan::open("B1".into(), "M1".into(), date(2026, 10, 1)).close(date(2026, 10, 5));
        assert!(!loan.is_active());
        assert_eq!(loan.return_date, Some(date(2026, 10, 5)));
    }

    #[test]
    fn display_includes_return_date_once_closed() {
        let loan = Loan::open("B1".into(), "M1".into(), date(2026, 10, 1));
        assert_eq!(loan.to_string(), "B1 borrowed by M1 on 2026-10-01");

        let loan = loan.close(date(2026, 10, 5));
        assert_eq!(
            loan.to_string(),
            "B1 borrowed by M1 on 2026-10-01, returned 2026-10-05"
        );
    }

    #[test]
    fn serializes_dates_as_iso_strings() {
        let loan = Loan::open("B2".into(), "M2".into(), date(2026, 1, 31));
        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["book_id"], "B2");
        assert_eq!(json["borrow_date"], "2026-01-31");
        assert!(json["return_date"].is_null());
    }
}
