//! # Library: memo and book operations on top of a [`MemoBackend`]
//!
//! [`Library`] wraps a backend and holds the logic the screens share:
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`add_memos`](Library::add_memos) | Validates the form, splits the block, resolves or creates the book, inserts each memo sequentially and counts successes. |
//! | [`find_or_create_book`](Library::find_or_create_book) | Case-insensitive `(title, author)` lookup; inserts only when nothing matches. |
//! | [`user_books`](Library::user_books) / [`book_memos`](Library::book_memos) / [`random_memo`](Library::random_memo) | Thin pass-throughs used by the browsers. |
//! | [`check_admin`](Library::check_admin) | Admin-table lookup that fails closed. |
//!
//! Inserts are never batched or parallelised: a failed memo is skipped and the
//! remaining ones still go through, so the reported count is exact.

use thiserror::Error;

use crate::backend::{BackendResult, MemoBackend};
use crate::error::BackendError;
use crate::models::{BookMemo, NewBook, NewMemo, RandomMemo, RowId, UserBook};

/// Why an add-memos submission produced nothing.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AddMemosError {
    #[error("Please fill in the title, author and text")]
    MissingFields,
    #[error("No memos found in the text")]
    NoSegments,
    #[error("No memos could be saved")]
    NothingSaved { failed: usize },
    #[error("{0}")]
    Backend(#[from] BackendError),
}

/// Outcome of a successful add-memos submission.
#[derive(Clone, Debug, PartialEq)]
pub struct AddMemosReport {
    pub book_id: RowId,
    pub created_book: bool,
    pub inserted: usize,
    pub failed: usize,
}

/// Split a text block into memos.
///
/// A line that is empty or whitespace-only separates memos. Each memo is
/// trimmed and empty ones are dropped. Lines inside a memo are joined with
/// `\n`, so `\r\n` input is normalised.
pub fn split_memo_block(block: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in block.lines() {
        if line.trim().is_empty() {
            flush_segment(&mut current, &mut segments);
        } else {
            current.push(line);
        }
    }
    flush_segment(&mut current, &mut segments);

    segments
}

fn flush_segment(lines: &mut Vec<&str>, out: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let segment = lines.join("\n").trim().to_string();
    if !segment.is_empty() {
        out.push(segment);
    }
    lines.clear();
}

pub struct Library<B: MemoBackend> {
    backend: B,
}

impl<B: MemoBackend> Library<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Store every memo of `block` under the book `(title, author)`.
    pub async fn add_memos(
        &self,
        title: &str,
        author: &str,
        block: &str,
    ) -> Result<AddMemosReport, AddMemosError> {
        let title = title.trim();
        let author = author.trim();
        if title.is_empty() || author.is_empty() || block.trim().is_empty() {
            return Err(AddMemosError::MissingFields);
        }

        let segments = split_memo_block(block);
        if segments.is_empty() {
            return Err(AddMemosError::NoSegments);
        }

        let (book_id, created_book) = self.find_or_create_book(title, author).await?;

        let mut inserted = 0;
        let mut failed = 0;
        for content in segments {
            let memo = NewMemo {
                book_id: book_id.clone(),
                content,
            };
            match self.backend.insert_memo(&memo).await {
                Ok(()) => inserted += 1,
                Err(_) => failed += 1,
            }
        }

        if inserted == 0 {
            return Err(AddMemosError::NothingSaved { failed });
        }

        Ok(AddMemosReport {
            book_id,
            created_book,
            inserted,
            failed,
        })
    }

    /// Returns the id of the matching book and whether it had to be created.
    pub async fn find_or_create_book(
        &self,
        title: &str,
        author: &str,
    ) -> BackendResult<(RowId, bool)> {
        let books = self.backend.list_books().await?;
        if let Some(book) = books.iter().find(|b| b.matches(title, author)) {
            return Ok((book.id.clone(), false));
        }

        let id = self
            .backend
            .insert_book(&NewBook {
                title: title.to_string(),
                author: author.to_string(),
            })
            .await?;
        Ok((id, true))
    }

    pub async fn user_books(&self) -> BackendResult<Vec<UserBook>> {
        self.backend.list_user_books().await
    }

    pub async fn book_memos(&self, book_id: &RowId) -> BackendResult<Vec<BookMemo>> {
        self.backend.list_book_memos(book_id).await
    }

    pub async fn random_memo(&self) -> BackendResult<Option<RandomMemo>> {
        self.backend.random_memo().await
    }

    /// `true` only when the lookup succeeds and lists `email`.
    pub async fn check_admin(&self, email: Option<&str>) -> bool {
        let Some(email) = email.filter(|e| !e.is_empty()) else {
            return false;
        };
        self.backend.is_admin(email).await.unwrap_or(false)
    }
}
