//! # Rows and view models exchanged with the remote service
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Book`] | A row of the `books` table. Identity is the case-insensitive `(title, author)` pair. |
//! | [`Memo`] | A row of the `memos` table. Always belongs to one book, never edited. |
//! | [`BookMemo`] | A memo as listed in a book's detail view (no `book_id`). |
//! | [`RandomMemo`] | The row returned by the `get_random_memo` remote procedure. |
//! | [`UserBook`] | A book annotated with how many memos it holds. |
//! | [`NewBook`] / [`NewMemo`] | Insert payloads. |
//!
//! Primary keys are carried as [`RowId`], which accepts either a JSON string
//! (UUID keys) or a JSON integer (bigint keys).

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque primary key of a row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowId(pub String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RowId(s),
            Raw::Int(n) => RowId(n.to_string()),
        })
    }
}

/// PostgREST sends `null` for absent text columns; treat it as empty.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: RowId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
}

impl Book {
    /// Case-insensitive identity check used to avoid duplicate book rows.
    pub fn matches(&self, title: &str, author: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
            && self.author.to_lowercase() == author.to_lowercase()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    pub id: RowId,
    pub book_id: RowId,
    pub content: String,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMemo {
    pub book_id: RowId,
    pub content: String,
}

/// A memo inside a book's detail view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookMemo {
    pub id: RowId,
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

impl BookMemo {
    /// Creation date as `YYYY-MM-DD`, or the raw timestamp if it can't be parsed.
    pub fn created_date(&self) -> String {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.created_at) {
            return ts.format("%Y-%m-%d").to_string();
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f") {
            return ts.format("%Y-%m-%d").to_string();
        }
        self.created_at.clone()
    }
}

impl From<Memo> for BookMemo {
    fn from(memo: Memo) -> Self {
        Self {
            id: memo.id,
            content: memo.content,
            created_at: memo.created_at,
        }
    }
}

/// Row returned by the random-pick remote procedure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomMemo {
    pub id: RowId,
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
}

/// A book with the number of memos stored under it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserBook {
    pub book_id: RowId,
    pub title: String,
    pub author: String,
    pub memo_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_id_accepts_strings_and_integers() {
        let uuid: Book =
            serde_json::from_str(r#"{"id":"6c1d","title":"Moby Dick","author":"Melville"}"#)
                .unwrap();
        assert_eq!(uuid.id, RowId::new("6c1d"));

        let int: Book = serde_json::from_str(r#"{"id":42,"title":"A","author":"B"}"#).unwrap();
        assert_eq!(int.id.as_str(), "42");
    }

    #[test]
    fn book_match_ignores_case() {
        let book = Book {
            id: RowId::new("1"),
            title: "Moby Dick".into(),
            author: "Melville".into(),
        };
        assert!(book.matches("moby dick", "MELVILLE"));
        assert!(!book.matches("Moby Dick", "Hawthorne"));
    }

    #[test]
    fn created_date_formats_timestamps() {
        let memo = |created_at: &str| BookMemo {
            id: RowId::new("1"),
            content: "x".into(),
            created_at: created_at.into(),
        };
        assert_eq!(memo("2024-05-01T10:20:30.123456+00:00").created_date(), "2024-05-01");
        assert_eq!(memo("2024-05-01T10:20:30.5").created_date(), "2024-05-01");
        assert_eq!(memo("yesterday").created_date(), "yesterday");
    }

    #[test]
    fn random_memo_tolerates_missing_book_fields() {
        let row: RandomMemo =
            serde_json::from_str(r#"{"id":7,"content":"Call me Ishmael.","author":null}"#).unwrap();
        assert_eq!(row.title, "");
        assert_eq!(row.author, "");
        assert_eq!(row.content, "Call me Ishmael.");
    }
}
