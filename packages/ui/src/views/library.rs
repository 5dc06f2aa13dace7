//! Library browser: the list of books with their memo counts, and one
//! book's memos revealed a page at a time as the reader scrolls.

use dioxus::prelude::*;
use store::{BookMemo, RevealPager, UserBook};

use crate::components::Spinner;
use crate::icons::{FaArrowLeft, FaBook, FaChevronRight};
use crate::services::use_services;
use crate::views::ModalOverlay;
use crate::Icon;

#[component]
pub fn BooksListDialog(on_close: EventHandler<()>, on_select: EventHandler<UserBook>) -> Element {
    let services = use_services();
    let books = use_resource(move || {
        let library = services.library.clone();
        async move { library.user_books().await }
    });

    let count_line = match &*books.read() {
        Some(Ok(list)) => format!("{} books", list.len()),
        _ => String::new(),
    };

    rsx! {
        ModalOverlay {
            title: "Library",
            on_close,
            wide: true,
            if !count_line.is_empty() {
                p { class: "muted library-count", "{count_line}" }
            }
            match &*books.read() {
                None => rsx! { Spinner {} },
                Some(Err(e)) => rsx! { p { class: "form-message form-error", "{e}" } },
                Some(Ok(list)) if list.is_empty() => rsx! {
                    p { class: "muted empty-state", "No books yet" }
                },
                Some(Ok(list)) => rsx! {
                    ul { class: "book-list",
                        for book in list.iter().cloned() {
                            BookRow { key: "{book.book_id}", book: book.clone(), on_select }
                        }
                    }
                },
            }
        }
    }
}

/// All memos of `book`, newest first. The full set is fetched once and
/// revealed in pages when the last visible card scrolls into view.
#[component]
pub fn BookMemosDialog(
    book: UserBook,
    on_back: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let services = use_services();
    let page_size = services.config.library.page_size;
    let mut pager = use_signal(RevealPager::<BookMemo>::default);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);

    let book_id = book.book_id.clone();
    use_hook(move || {
        let library = services.library.clone();
        spawn(async move {
            match library.book_memos(&book_id).await {
                Ok(memos) => pager.set(RevealPager::new(memos, page_size)),
                Err(e) => {
                    tracing::warn!(book_id = %book_id, "Could not load memos: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        })
    });

    let reveal_more = move |evt: Event<VisibleData>| {
        if evt.is_intersecting().unwrap_or(false) && pager.peek().has_more() {
            pager.write().reveal_next();
        }
    };

    let view = pager.read();
    let visible = view.visible().to_vec();
    let has_more = view.has_more();
    let total = view.total();
    drop(view);
    let last = visible.len().saturating_sub(1);

    rsx! {
        ModalOverlay {
            title: "{book.title}",
            on_close,
            wide: true,
            div { class: "book-detail-header",
                button {
                    class: "icon-button",
                    aria_label: "Back to library",
                    onclick: move |_| on_back.call(()),
                    Icon { icon: FaArrowLeft, width: 14, height: 14 }
                }
                span { class: "book-author", "{book.author}" }
            }
            if loading() {
                Spinner {}
            } else if let Some(message) = error() {
                p { class: "form-message form-error", "{message}" }
            } else if total == 0 {
                p { class: "muted empty-state", "No memos for this book yet" }
            } else {
                div { class: "memo-grid",
                    for (index, memo) in visible.into_iter().enumerate() {
                        if index == last && has_more {
                            div {
                                key: "{memo.id}",
                                class: "memo-tile",
                                onvisible: reveal_more,
                                MemoTile { memo: memo.clone() }
                            }
                        } else {
                            div { key: "{memo.id}", class: "memo-tile",
                                MemoTile { memo: memo.clone() }
                            }
                        }
                    }
                }
                if has_more {
                    p { class: "muted load-more", "Scroll for more" }
                }
            }
        }
    }
}

#[component]
fn BookRow(book: UserBook, on_select: EventHandler<UserBook>) -> Element {
    let selected = book.clone();
    rsx! {
        li {
            button {
                class: "book-row",
                onclick: move |_| on_select.call(selected.clone()),
                span { class: "book-icon",
                    Icon { icon: FaBook, width: 16, height: 16 }
                }
                span { class: "book-meta",
                    span { class: "book-title", "{book.title}" }
                    span { class: "book-author", "{book.author}" }
                    span { class: "book-count", "{book.memo_count} memos" }
                }
                Icon { icon: FaChevronRight, width: 12, height: 12 }
            }
        }
    }
}

#[component]
fn MemoTile(memo: BookMemo) -> Element {
    let date = memo.created_date();
    rsx! {
        p { class: "memo-tile-content", "{memo.content}" }
        p { class: "memo-tile-date", "{date}" }
    }
}
