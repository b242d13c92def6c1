//! Book handlers
//!
//! Catalog listing and lookup are public. Registering a book needs the
//! manager; borrowing and returning need any authenticated caller.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Extension, Json,
};
use serde::Deserialize;

use super::negotiate;
use crate::auth::{Caller, Role};
use crate::domain::entities::{BookId, MemberId, NewBook};
use crate::error::AppError;
use crate::render::{render_book, render_books, render_loan};
use crate::AppState;

/// Query parameters for GET /books
#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    /// Only books that are not on loan
    #[serde(default)]
    pub available: bool,
    /// Case-insensitive title/author filter
    pub q: Option<String>,
}

/// Request body for POST /books/:id/borrow
#[derive(Debug, Default, Deserialize)]
pub struct BorrowRequest {
    /// Defaults to the caller when a member borrows for themselves
    #[serde(default)]
    pub member_id: Option<MemberId>,
}

/// GET /books
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let mut books = match query.q.as_deref() {
        Some(q) => state.library.search_books(q).await?,
        None if query.available => state.library.list_available_books().await?,
        None => state.library.list_all_books().await?,
    };
    if query.available {
        books.retain(|b| b.available);
    }

    let heading = if query.available {
        "Available Books"
    } else {
        "Catalog"
    };
    Ok(negotiate(&headers, StatusCode::OK, &books, || {
        render_books(heading, &books)
    }))
}

/// GET /books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let book = state
        .library
        .find_book(&BookId::from(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(negotiate(&headers, StatusCode::OK, &book, || render_book(&book)))
}

/// POST /books
///
/// Registers a book, or replaces the title and author of an existing one.
pub async fn create_book(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    headers: HeaderMap,
    Json(body): Json<NewBook>,
) -> Result<Response, AppError> {
    caller.require_manager()?;

    let book = state.library.add_book(body).await?;

    Ok(negotiate(&headers, StatusCode::CREATED, &book, || {
        render_book(&book)
    }))
}

/// Who a borrow is booked to.
///
/// A member may only borrow for themselves; the manager names the member.
fn borrower(caller: &Caller, requested: Option<MemberId>) -> Result<MemberId, AppError> {
    let requested = requested
        .map(|id| MemberId::from(id.as_str().trim()))
        .filter(|id| !id.as_str().is_empty());

    match (caller.role, requested) {
        (Role::Member, None) => Ok(MemberId::from(caller.user_id.as_str())),
        (Role::Member, Some(id)) if id.as_str() == caller.user_id => Ok(id),
        (Role::Member, Some(_)) => Err(AppError::Forbidden),
        (Role::Manager, Some(id)) => Ok(id),
        (Role::Manager, None) => Err(AppError::BadRequest("member_id is required".to_string())),
    }
}

/// POST /books/:id/borrow
///
/// The body is optional; a member posting nothing borrows for themselves.
pub async fn borrow_book(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<BorrowRequest>>,
) -> Result<Response, AppError> {
    let requested = body.and_then(|Json(body)| body.member_id);
    let member_id = borrower(&caller, requested)?;

    let loan = state
        .library
        .borrow_book(&BookId::from(id), &member_id)
        .await?;

    Ok(negotiate(&headers, StatusCode::CREATED, &loan, || {
        render_loan(&loan)
    }))
}

/// POST /books/:id/return
pub async fn return_book(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let loan = state.library.return_book(&BookId::from(id)).await?;
    tracing::debug!(book_id = %loan.book_id, by = %caller.user_id, "Return accepted");

    Ok(negotiate(&headers, StatusCode::OK, &loan, || render_loan(&loan)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_query(query: &str) -> BookQuery {
        let uri: axum::http::Uri = format!("/books?{}", query).parse().unwrap();
        Query::<BookQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn book_query_defaults() {
        let query = parse_query("");
        assert!(!query.available);
        assert!(query.q.is_none());
    }

    #[test]
    fn book_query_filters() {
        let query = parse_query("available=true&q=tolkien");
        assert!(query.available);
        assert_eq!(query.q.as_deref(), Some("tolkien"));
    }

    #[test]
    fn borrow_request_member_is_optional() {
        let empty: BorrowRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.member_id.is_none());

        let named: BorrowRequest = serde_json::from_str(r#"{"member_id":"M1"}"#).unwrap();
        assert_eq!(named.member_id, Some(MemberId::from("M1")));
    }

    fn caller(user_id: &str, role: Role) -> Caller {
        Caller {
            user_id: user_id.to_string(),
            role,
        }
    }

    #[test]
    fn member_borrows_for_themselves() {
        let m1 = caller("M1", Role::Member);

        assert_eq!(borrower(&m1, None).unwrap(), MemberId::from("M1"));
        assert_eq!(
            borrower(&m1, Some(MemberId::from(" M1 "))).unwrap(),
            MemberId::from("M1")
        );
        assert!(matches!(
            borrower(&m1, Some(MemberId::from("M2"))),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn manager_must_name_member() {
        let manager = caller("manager", Role::Manager);

        assert_eq!(
            borrower(&manager, Some(MemberId::from("M2 "))).unwrap(),
            MemberId::from("M2")
        );
        assert!(matches!(
            borrower(&manager, None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            borrower(&manager, Some(MemberId::from("  "))),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn new_book_body() {
        let body: NewBook =
            serde_json::from_str(r#"{"id":"B4","title":"Dune","author":"Frank Herbert"}"#)
                .unwrap();
        assert_eq!(body.id, BookId::from("B4"));
        assert_eq!(body.title, "Dune");
    }
}
