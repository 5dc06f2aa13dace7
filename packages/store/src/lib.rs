//! Platform-free core of Femos: models, backend traits, and the logic behind
//! each screen (redirect handling, password reset, memo splitting, paging,
//! theme preference). Nothing in here touches the DOM or the network.

pub mod backend;
pub mod config;
pub mod error;
pub mod kv;
pub mod library;
pub mod models;
pub mod paging;
pub mod recovery;
pub mod redirect;
pub mod theme;

mod memory;
pub use memory::MemoryBackend;

pub use backend::{MemoBackend, PasswordUpdater};
pub use config::FemosConfig;
pub use error::BackendError;
pub use kv::{KeyValueStore, MemoryKv};
pub use library::{split_memo_block, AddMemosError, AddMemosReport, Library};
pub use models::{Book, BookMemo, Memo, NewBook, NewMemo, RandomMemo, RowId, UserBook};
pub use paging::RevealPager;
pub use recovery::{PasswordRejection, ResetError};
pub use redirect::{
    parse_redirect_state, RecoveryRedirectState, RecoverySource, RecoveryTokens, RedirectAction,
};
pub use theme::{ResolvedTheme, ThemePreference};
