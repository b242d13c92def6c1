//! SQL adapter for LibraryRepository
//!
//! Works against PostgreSQL or SQLite, chosen by the connection URL.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Schema, Set, TransactionTrait,
};

use crate::domain::entities::{Book, BookId, Loan, Member, MemberId, NewBook, NewMember};
use crate::domain::ports::{CatalogRepository, LibraryRepository, LoanRepository};
use crate::entity::{books, loans, members};
use crate::error::DomainError;

fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// SeaORM implementation of LibraryRepository
pub struct SqlLibraryRepository {
    db: DatabaseConnection,
}

impl SqlLibraryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect and make sure the tables exist
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let db = Database::connect(url).await.map_err(db_err)?;
        let repo = Self::new(db);
        repo.ensure_schema().await?;
        Ok(repo)
    }

    /// Create the books, members and loans tables if they are missing
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        // loans references the other two, so it goes last
        let mut statements = [
            schema.create_table_from_entity(books::Entity),
            schema.create_table_from_entity(members::Entity),
            schema.create_table_from_entity(loans::Entity),
        ];

        for statement in statements.iter_mut() {
            statement.if_not_exists();
            self.db
                .execute(backend.build(&*statement))
                .await
                .map_err(db_err)?;
        }

        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for SqlLibraryRepository {
    async fn add_book(&self, book: &NewBook) -> Result<Book, DomainError> {
        let model = books::ActiveModel {
            id: Set(book.id.0.clone()),
            title: Set(book.title.clone()),
            author: Set(book.author.clone()),
            available: Set(true),
        };

        // Replacing a book leaves its availability alone
        books::Entity::insert(model)
            .on_conflict(
                OnConflict::column(books::Column::Id)
                    .update_columns([books::Column::Title, books::Column::Author])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        self.find_book(&book.id).await?.ok_or_else(|| {
            DomainError::Internal(format!("Book {} disappeared after upsert", book.id))
        })
    }

    async fn register_member(&self, member: &NewMember) -> Result<Member, DomainError> {
        let model = members::ActiveModel {
            id: Set(member.id.0.clone()),
            name: Set(member.name.clone()),
        };

        members::Entity::insert(model)
            .on_conflict(
                OnConflict::column(members::Column::Id)
                    .update_column(members::Column::Name)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Member {
            id: member.id.clone(),
            name: member.name.clone(),
        })
    }

    async fn find_book(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        let result = books::Entity::find_by_id(id.0.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        let result = members::Entity::find_by_id(id.0.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn member_exists(&self, id: &MemberId) -> Result<bool, DomainError> {
        Ok(self.find_member(id).await?.is_some())
    }

    async fn list_all_books(&self) -> Result<Vec<Book>, DomainError> {
        let results = books::Entity::find()
            .order_by_asc(books::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn list_available_books(&self) -> Result<Vec<Book>, DomainError> {
        let results = books::Entity::find()
            .filter(books::Column::Available.eq(true))
            .order_by_asc(books::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

#[async_trait]
impl LoanRepository for SqlLibraryRepository {
    async fn find_active_loan(&self, book_id: &BookId) -> Result<Option<Loan>, DomainError> {
        let result = loans::Entity::find_by_id(book_id.0.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_active_loans(&self) -> Result<Vec<Loan>, DomainError> {
        let results = loans::Entity::find()
            .order_by_asc(loans::Column::BookId)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

#[async_trait]
impl LibraryRepository for SqlLibraryRepository {
    async fn commit_borrow(&self, loan: &Loan) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Conditional flip: only succeeds while the book is still available
        let updated = books::Entity::update_many()
            .col_expr(books::Column::Available, Expr::value(false))
            .filter(books::Column::Id.eq(loan.book_id.as_str()))
            .filter(books::Column::Available.eq(true))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            let exists = books::Entity::find_by_id(loan.book_id.0.clone())
                .one(&txn)
                .await
                .map_err(db_err)?
                .is_some();
            txn.rollback().await.map_err(db_err)?;

            return Err(if exists {
                DomainError::Conflict(format!("Book {} is already on loan", loan.book_id))
            } else {
                DomainError::NotFound(format!("Book {} not found", loan.book_id))
            });
        }

        loans::ActiveModel {
            book_id: Set(loan.book_id.0.clone()),
            member_id: Set(loan.member_id.0.clone()),
            borrow_date: Set(loan.borrow_date),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn commit_return(
        &self,
        book_id: &BookId,
        return_date: NaiveDate,
    ) -> Result<Loan, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Dropping txn on any early return rolls it back
        let active = loans::Entity::find_by_id(book_id.0.clone())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound(format!("Book {} has no active loan", book_id)))?;

        loans::Entity::delete_by_id(book_id.0.clone())
            .exec(&txn)
            .await
            .map_err(db_err)?;

        books::Entity::update_many()
            .col_expr(books::Column::Available, Expr::value(true))
            .filter(books::Column::Id.eq(book_id.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(Loan::from(active).close(return_date))
    }
}

/// Convert SeaORM model to domain entity
impl From<books::Model> for Book {
    fn from(model: books::Model) -> Self {
        Book {
            id: BookId(model.id),
            title: model.title,
            author: model.author,
            available: model.available,
        }
    }
}

impl From<members::Model> for Member {
    fn from(model: members::Model) -> Self {
        Member {
            id: MemberId(model.id),
            name: model.name,
        }
    }
}

impl From<loans::Model> for Loan {
    fn from(model: loans::Model) -> Self {
        Loan::open(
            BookId(model.book_id),
            MemberId(model.member_id),
            model.borrow_date,
        )
    }
}
