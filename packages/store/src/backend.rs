//! # Backend traits: the seam between the app and the remote service
//!
//! [`MemoBackend`] is the typed surface the screens need from the hosted
//! database: list/insert books and memos, the aggregated library view, the
//! random pick, and admin membership. [`PasswordUpdater`] is the one auth
//! call the password-reset flow needs.
//!
//! Implementations: [`crate::MemoryBackend`] (tests) and the HTTP gateway in
//! the `api` crate. Futures are not required to be `Send`; the app runs on a
//! single-threaded WASM event loop.

use crate::error::BackendError;
use crate::models::{Book, BookMemo, NewBook, NewMemo, RandomMemo, RowId, UserBook};

pub type BackendResult<T> = Result<T, BackendError>;

/// Typed access to the `books`, `memos` and `admins` tables.
pub trait MemoBackend {
    /// Every book, unordered.
    fn list_books(&self) -> impl std::future::Future<Output = BackendResult<Vec<Book>>>;

    /// Insert a book and return its id.
    fn insert_book(
        &self,
        book: &NewBook,
    ) -> impl std::future::Future<Output = BackendResult<RowId>>;

    fn insert_memo(&self, memo: &NewMemo)
        -> impl std::future::Future<Output = BackendResult<()>>;

    /// All memos of one book, newest first.
    fn list_book_memos(
        &self,
        book_id: &RowId,
    ) -> impl std::future::Future<Output = BackendResult<Vec<BookMemo>>>;

    /// Books with their memo counts, ordered by title.
    fn list_user_books(&self) -> impl std::future::Future<Output = BackendResult<Vec<UserBook>>>;

    /// Zero or one random memo.
    fn random_memo(&self) -> impl std::future::Future<Output = BackendResult<Option<RandomMemo>>>;

    /// Whether `email` is listed in the `admins` table.
    fn is_admin(&self, email: &str) -> impl std::future::Future<Output = BackendResult<bool>>;
}

/// Updates the password of the currently authenticated user.
pub trait PasswordUpdater {
    fn update_password(
        &self,
        new_password: &str,
    ) -> impl std::future::Future<Output = BackendResult<()>>;
}
