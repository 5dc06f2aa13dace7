mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod login_dialog;
pub use login_dialog::LoginDialog;

mod reset_password;
pub use reset_password::ResetPasswordDialog;

mod add_memos;
pub use add_memos::AddMemosDialog;

mod library;
pub use library::{BookMemosDialog, BooksListDialog};
