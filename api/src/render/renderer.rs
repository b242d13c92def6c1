//! Plain-text renderer
//!
//! One record per line, in the same shape as the entities' Display impls.

use crate::auth::{Caller, Role};
use crate::domain::entities::{Book, Loan, Member};

/// Render a titled book listing
pub fn render_books(heading: &str, books: &[Book]) -> String {
    let mut buf = format!("# {}\n\n", heading);

    if books.is_empty() {
        buf.push_str("_No books found._\n");
        return buf;
    }

    for book in books {
        buf.push_str(&format!("- {}\n", book));
    }

    let available = books.iter().filter(|b| b.available).count();
    buf.push_str(&format!(
        "\n{} book(s), {} available\n",
        books.len(),
        available
    ));

    buf
}

pub fn render_book(book: &Book) -> String {
    format!("{}\n", book)
}

/// Render the active loans listing
pub fn render_loans(loans: &[Loan]) -> String {
    let mut buf = String::from("# Active Loans\n\n");

    if loans.is_empty() {
        buf.push_str("_No books are on loan._\n");
        return buf;
    }

    for loan in loans {
        buf.push_str(&format!("- {}\n", loan));
    }

    buf
}

pub fn render_loan(loan: &Loan) -> String {
    format!("{}\n", loan)
}

pub fn render_member(member: &Member) -> String {
    format!("{}\n", member)
}

pub fn render_caller(caller: &Caller) -> String {
    let role = match caller.role {
        Role::Manager => "manager",
        Role::Member => "member",
    };
    format!("Logged in as {} ({})\n", caller.user_id, role)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::entities::NewBook;

    fn hobbit(available: bool) -> Book {
        let mut book = NewBook::new("B3", "The Hobbit", "J.R.R. Tolkien").into_book();
        book.available = available;
        book
    }

    #[test]
    fn render_books_lists_each_book() {
        let books = vec![
            NewBook::new("B1", "1984", "George Orwell").into_book(),
            hobbit(false),
        ];

        let result = render_books("Catalog", &books);

        assert!(result.starts_with("# Catalog\n\n"));
        assert!(result.contains("- B1 - 1984 by George Orwell (available)\n"));
        assert!(result.contains("- B3 - The Hobbit by J.R.R. Tolkien (borrowed)\n"));
        assert!(result.contains("2 book(s), 1 available"));
    }

    #[test]
    fn render_books_empty() {
        let result = render_books("Available Books", &[]);
        assert!(result.contains("_No books found._"));
    }

    #[test]
    fn render_single_book() {
        assert_eq!(
            render_book(&hobbit(true)),
            "B3 - The Hobbit by J.R.R. Tolkien (available)\n"
        );
    }

    #[test]
    fn render_loans_lists_active_loans() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let loans = vec![Loan::open("B1".into(), "M1".into(), date)];

        let result = render_loans(&loans);

        assert!(result.contains("- B1 borrowed by M1 on 2026-10-01\n"));
        assert!(render_loans(&[]).contains("_No books are on loan._"));
    }

    #[test]
    fn render_closed_loan() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let returned = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        let loan = Loan::open("B1".into(), "M1".into(), date).close(returned);

        assert_eq!(
            render_loan(&loan),
            "B1 borrowed by M1 on 2026-10-01, returned 2026-10-05\n"
        );
    }

    #[test]
    fn render_caller_role() {
        let caller = Caller {
            user_id: "M1".to_string(),
            role: Role::Member,
        };
        assert_eq!(render_caller(&caller), "Logged in as M1 (member)\n");
    }
}
