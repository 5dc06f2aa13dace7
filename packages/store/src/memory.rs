use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::backend::{BackendResult, MemoBackend, PasswordUpdater};
use crate::error::BackendError;
use crate::models::{Book, BookMemo, Memo, NewBook, NewMemo, RandomMemo, RowId, UserBook};

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    books: Vec<Book>,
    memos: Vec<Memo>,
    admins: Vec<String>,
    random_calls: usize,
    book_inserts: usize,
    /// Memo contents whose insert is rejected.
    rejected_contents: HashSet<String>,
    /// When set, every call fails with this error.
    outage: Option<BackendError>,
    password_updates: Vec<String>,
    password_error: Option<BackendError>,
}

impl State {
    fn next_id(&mut self) -> RowId {
        self.next_id += 1;
        RowId(self.next_id.to_string())
    }

    fn check_outage(&self) -> BackendResult<()> {
        match &self.outage {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// In-memory backend for tests and offline development.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_admin(&self, email: &str) {
        self.state.lock().unwrap().admins.push(email.to_string());
    }

    /// Make inserts of this exact memo content fail.
    pub fn reject_memo(&self, content: &str) {
        self.state
            .lock()
            .unwrap()
            .rejected_contents
            .insert(content.to_string());
    }

    /// Fail every subsequent call with `err` (`None` restores service).
    pub fn set_outage(&self, err: Option<BackendError>) {
        self.state.lock().unwrap().outage = err;
    }

    /// Fail subsequent password updates with `err`.
    pub fn fail_password_updates(&self, err: BackendError) {
        self.state.lock().unwrap().password_error = Some(err);
    }

    pub fn books(&self) -> Vec<Book> {
        self.state.lock().unwrap().books.clone()
    }

    pub fn memos(&self) -> Vec<Memo> {
        self.state.lock().unwrap().memos.clone()
    }

    pub fn book_inserts(&self) -> usize {
        self.state.lock().unwrap().book_inserts
    }

    /// Passwords the updater was called with, in call order.
    pub fn password_updates(&self) -> Vec<String> {
        self.state.lock().unwrap().password_updates.clone()
    }
}

impl MemoBackend for MemoryBackend {
    async fn list_books(&self) -> BackendResult<Vec<Book>> {
        let state = self.state.lock().unwrap();
        state.check_outage()?;
        Ok(state.books.clone())
    }

    async fn insert_book(&self, book: &NewBook) -> BackendResult<RowId> {
        let mut state = self.state.lock().unwrap();
        state.check_outage()?;
        let id = state.next_id();
        state.book_inserts += 1;
        state.books.push(Book {
            id: id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
        });
        Ok(id)
    }

    async fn insert_memo(&self, memo: &NewMemo) -> BackendResult<()> {
        let mut state = self.state.lock().unwrap();
        state.check_outage()?;
        if state.rejected_contents.contains(&memo.content) {
            return Err(BackendError::service(400, "memo rejected"));
        }
        if !state.books.iter().any(|b| b.id == memo.book_id) {
            return Err(BackendError::service(409, "unknown book"));
        }
        let id = state.next_id();
        let seq = state.memos.len();
        state.memos.push(Memo {
            id,
            book_id: memo.book_id.clone(),
            content: memo.content.clone(),
            created_at: format!("2024-01-01T00:{:02}:{:02}+00:00", (seq / 60) % 60, seq % 60),
        });
        Ok(())
    }

    async fn list_book_memos(&self, book_id: &RowId) -> BackendResult<Vec<BookMemo>> {
        let state = self.state.lock().unwrap();
        state.check_outage()?;
        Ok(state
            .memos
            .iter()
            .rev()
            .filter(|m| &m.book_id == book_id)
            .cloned()
            .map(BookMemo::from)
            .collect())
    }

    async fn list_user_books(&self) -> BackendResult<Vec<UserBook>> {
        let state = self.state.lock().unwrap();
        state.check_outage()?;
        let mut books: Vec<UserBook> = state
            .books
            .iter()
            .map(|b| UserBook {
                book_id: b.id.clone(),
                title: b.title.clone(),
                author: b.author.clone(),
                memo_count: state.memos.iter().filter(|m| m.book_id == b.id).count() as u64,
            })
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn random_memo(&self) -> BackendResult<Option<RandomMemo>> {
        let mut state = self.state.lock().unwrap();
        state.check_outage()?;
        if state.memos.is_empty() {
            return Ok(None);
        }
        // Rotate through the memos so repeated calls differ.
        let memo = state.memos[state.random_calls % state.memos.len()].clone();
        state.random_calls += 1;
        let book = state.books.iter().find(|b| b.id == memo.book_id);
        Ok(Some(RandomMemo {
            id: memo.id,
            content: memo.content,
            title: book.map(|b| b.title.clone()).unwrap_or_default(),
            author: book.map(|b| b.author.clone()).unwrap_or_default(),
        }))
    }

    async fn is_admin(&self, email: &str) -> BackendResult<bool> {
        let state = self.state.lock().unwrap();
        state.check_outage()?;
        Ok(state.admins.iter().any(|a| a == email))
    }
}

impl PasswordUpdater for MemoryBackend {
    async fn update_password(&self, new_password: &str) -> BackendResult<()> {
        let mut state = self.state.lock().unwrap();
        state.check_outage()?;
        state.password_updates.push(new_password.to_string());
        match &state.password_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_books_count_memos_per_book() {
        let backend = MemoryBackend::new();
        let moby = backend
            .insert_book(&NewBook {
                title: "Moby Dick".into(),
                author: "Melville".into(),
            })
            .await
            .unwrap();
        let emma = backend
            .insert_book(&NewBook {
                title: "Emma".into(),
                author: "Austen".into(),
            })
            .await
            .unwrap();
        for content in ["one", "two"] {
            backend
                .insert_memo(&NewMemo {
                    book_id: moby.clone(),
                    content: content.into(),
                })
                .await
                .unwrap();
        }

        let books = backend.list_user_books().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "Emma");
        assert_eq!(books[0].memo_count, 0);
        assert_eq!(books[1].book_id, moby);
        assert_eq!(books[1].memo_count, 2);

        let memos = backend.list_book_memos(&moby).await.unwrap();
        assert_eq!(memos[0].content, "two");
        assert!(backend.list_book_memos(&emma).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_random_memo_empty_and_joined() {
        let backend = MemoryBackend::new();
        assert!(backend.random_memo().await.unwrap().is_none());

        let id = backend
            .insert_book(&NewBook {
                title: "Moby Dick".into(),
                author: "Melville".into(),
            })
            .await
            .unwrap();
        backend
            .insert_memo(&NewMemo {
                book_id: id,
                content: "Call me Ishmael.".into(),
            })
            .await
            .unwrap();

        let memo = backend.random_memo().await.unwrap().unwrap();
        assert_eq!(memo.title, "Moby Dick");
        assert_eq!(memo.author, "Melville");
    }

    #[tokio::test]
    async fn test_outage_fails_every_call() {
        let backend = MemoryBackend::new();
        backend.set_outage(Some(BackendError::Transport("offline".into())));
        assert!(backend.list_books().await.is_err());
        assert!(backend.is_admin("a@b.c").await.is_err());
        backend.set_outage(None);
        assert!(!backend.is_admin("a@b.c").await.unwrap());
    }
}
