//! [`MemoBackend`] over the hosted REST layer.
//!
//! Requests go out with the signed-in user's token when there is one so
//! that row-level security sees the real user; anonymous visitors use the
//! anon key and can only read.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use store::backend::BackendResult;
use store::{Book, BookMemo, MemoBackend, NewBook, NewMemo, RandomMemo, RowId, UserBook};

use crate::auth::AuthClient;
use crate::client::SupabaseClient;
use crate::error::ApiError;
use crate::rest::TableQuery;

const RANDOM_MEMO_RPC: &str = "rpc/get_random_memo";

#[derive(Clone)]
pub struct SupabaseBackend {
    http: SupabaseClient,
    auth: AuthClient,
}

/// A `books` row with its embedded `memos(count)` aggregate.
#[derive(Debug, Deserialize)]
struct BookWithCount {
    id: RowId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    memos: Vec<CountRow>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

impl From<BookWithCount> for UserBook {
    fn from(row: BookWithCount) -> Self {
        UserBook {
            book_id: row.id,
            title: row.title.unwrap_or_default(),
            author: row.author.unwrap_or_default(),
            memo_count: row.memos.first().map(|c| c.count).unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: RowId,
}

impl SupabaseBackend {
    pub fn new(http: SupabaseClient, auth: AuthClient) -> Self {
        Self { http, auth }
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    async fn bearer(&self) -> Option<String> {
        self.auth.valid_access_token().await
    }

    async fn fetch<T: DeserializeOwned>(&self, query: TableQuery) -> Result<Vec<T>, ApiError> {
        let bearer = self.bearer().await;
        let request = self
            .http
            .request(
                Method::GET,
                &self.http.rest_url(query.table()),
                bearer.as_deref(),
            )
            .query(&query.pairs());
        self.http.send_json(request).await
    }

    /// Insert one row. With `returning` the service echoes the stored row
    /// back, restricted to `select` columns.
    async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
        select: &str,
    ) -> Result<Vec<T>, ApiError> {
        let bearer = self.bearer().await;
        let request = self
            .http
            .request(Method::POST, &self.http.rest_url(table), bearer.as_deref())
            .header("Prefer", "return=representation")
            .query(&[("select", select)])
            .json(body);
        self.http.send_json(request).await
    }
}

impl MemoBackend for SupabaseBackend {
    async fn list_books(&self) -> BackendResult<Vec<Book>> {
        Ok(self
            .fetch(TableQuery::new("books").select("id,title,author"))
            .await?)
    }

    async fn insert_book(&self, book: &NewBook) -> BackendResult<RowId> {
        let rows: Vec<IdRow> = self.insert("books", book, "id").await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Decode("book insert returned no row".into()))?;
        tracing::info!(book_id = %row.id, title = %book.title, "created book");
        Ok(row.id)
    }

    async fn insert_memo(&self, memo: &NewMemo) -> BackendResult<()> {
        let bearer = self.bearer().await;
        let request = self
            .http
            .request(Method::POST, &self.http.rest_url("memos"), bearer.as_deref())
            .header("Prefer", "return=minimal")
            .json(memo);
        Ok(self.http.send_empty(request).await?)
    }

    async fn list_book_memos(&self, book_id: &RowId) -> BackendResult<Vec<BookMemo>> {
        Ok(self
            .fetch(
                TableQuery::new("memos")
                    .select("id,content,created_at")
                    .eq("book_id", book_id.as_str())
                    .order("created_at", false),
            )
            .await?)
    }

    async fn list_user_books(&self) -> BackendResult<Vec<UserBook>> {
        let rows: Vec<BookWithCount> = self
            .fetch(
                TableQuery::new("books")
                    .select("id,title,author,memos(count)")
                    .order("title", true),
            )
            .await?;
        Ok(rows.into_iter().map(UserBook::from).collect())
    }

    async fn random_memo(&self) -> BackendResult<Option<RandomMemo>> {
        let bearer = self.bearer().await;
        let request = self
            .http
            .request(
                Method::POST,
                &self.http.rest_url(RANDOM_MEMO_RPC),
                bearer.as_deref(),
            )
            .json(&serde_json::json!({}));
        let rows: Vec<RandomMemo> = self.http.send_json(request).await?;
        Ok(rows.into_iter().next())
    }

    async fn is_admin(&self, email: &str) -> BackendResult<bool> {
        let rows: Vec<serde_json::Value> = self
            .fetch(
                TableQuery::new("admins")
                    .select("email")
                    .eq("email", email)
                    .limit(1),
            )
            .await?;
        Ok(!rows.is_empty())
    }
}
