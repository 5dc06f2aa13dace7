use dioxus::prelude::*;

use store::UserBook;
use ui::icons::FaPlus;
use ui::views::{
    AddMemosDialog, BookMemosDialog, BooksListDialog, LoginDialog, ResetPasswordDialog,
};
use ui::{
    use_auth, use_recovery_redirect, use_services, use_space_shortcut, use_toast, Header, Icon,
    RandomMemoCard,
};

/// Which of the mutually exclusive dialogs is open. The password-reset
/// dialog is tracked separately because a redirect can open it on top of
/// anything.
#[derive(Clone, Debug, PartialEq)]
enum Dialog {
    Login,
    AddMemos,
    Library,
    BookMemos(UserBook),
}

#[component]
pub fn Home() -> Element {
    let services = use_services();
    let auth = use_auth();
    let toaster = use_toast();
    let mut dialog = use_signal(|| None::<Dialog>);
    let mut show_reset = use_signal(|| false);
    let mut reload = use_signal(|| 0u64);

    use_recovery_redirect(show_reset);
    use_space_shortcut(
        move || dialog.peek().is_some() || *show_reset.peek(),
        reload,
    );

    let logout = move |_| {
        let client = services.auth.clone();
        spawn(async move {
            if let Err(e) = client.sign_out().await {
                tracing::debug!("Signed out locally only: {e}");
            }
        });
    };

    let is_admin = auth().is_admin;

    rsx! {
        div { class: "app-shell",
            Header {
                on_library: move |_| dialog.set(Some(Dialog::Library)),
                on_login: move |_| dialog.set(Some(Dialog::Login)),
                on_logout: logout,
            }

            main { class: "app-main",
                RandomMemoCard { reload }
            }

            if is_admin {
                button {
                    class: "fab",
                    title: "Add memos",
                    aria_label: "Add memos",
                    onclick: move |_| dialog.set(Some(Dialog::AddMemos)),
                    Icon { icon: FaPlus, width: 18, height: 18 }
                }
            }

            match dialog() {
                Some(Dialog::Login) => rsx! {
                    LoginDialog { on_close: move |_| dialog.set(None) }
                },
                Some(Dialog::AddMemos) if is_admin => rsx! {
                    AddMemosDialog {
                        on_close: move |_| dialog.set(None),
                        on_success: move |count: usize| {
                            dialog.set(None);
                            toaster.success(format!("Added {count} memos"));
                            reload += 1;
                        },
                    }
                },
                Some(Dialog::Library) => rsx! {
                    BooksListDialog {
                        on_close: move |_| dialog.set(None),
                        on_select: move |book: UserBook| dialog.set(Some(Dialog::BookMemos(book))),
                    }
                },
                Some(Dialog::BookMemos(book)) => rsx! {
                    BookMemosDialog {
                        key: "{book.book_id}",
                        book,
                        on_back: move |_| dialog.set(Some(Dialog::Library)),
                        on_close: move |_| dialog.set(None),
                    }
                },
                _ => rsx! {},
            }

            if show_reset() {
                ResetPasswordDialog {
                    on_close: move |_| show_reset.set(false),
                    on_success: move |_| {
                        show_reset.set(false);
                        toaster.success("Password reset successful");
                        reload += 1;
                    },
                }
            }
        }
    }
}
