//! Transient notifications. One toast at a time; showing a new one replaces
//! the current toast and restarts its timer.

use std::time::Duration;

use dioxus::core::Task;
use dioxus::prelude::*;

use crate::timer::Deadline;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Handle returned by [`use_toast`].
#[derive(Clone, Copy)]
pub struct Toaster {
    current: Signal<Option<Toast>>,
    next_id: Signal<u64>,
}

impl Toaster {
    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message.into());
    }

    pub fn show(&self, kind: ToastKind, message: String) {
        let mut current = self.current;
        let mut next_id = self.next_id;
        let id = *next_id.peek();
        next_id += 1;
        current.set(Some(Toast { id, kind, message }));
    }

    pub fn dismiss(&self) {
        let mut current = self.current;
        current.set(None);
    }

    pub fn current(&self) -> Option<Toast> {
        (self.current)()
    }
}

pub fn use_toast() -> Toaster {
    use_context::<Toaster>()
}

/// Provides [`Toaster`] to `children` and renders the active toast.
///
/// The hide timer runs in this component's scope, so a toast raised by a
/// dialog outlives the dialog.
#[component]
pub fn ToastProvider(#[props(default = 3)] lifetime_secs: u64, children: Element) -> Element {
    let mut current = use_signal(|| None::<Toast>);
    let next_id = use_signal(|| 0u64);
    let mut timer = use_signal(|| None::<Task>);
    let hide = use_signal(Deadline::new);

    let toaster = use_context_provider(|| Toaster { current, next_id });

    use_effect(move || {
        let shown = current.read().is_some();
        let deadline = hide.peek().clone();
        if let Some(task) = timer.take() {
            task.cancel();
        }
        if shown {
            let lifetime = Duration::from_secs(lifetime_secs);
            let ticket = deadline.arm();
            let task = spawn(async move {
                if deadline.elapsed(ticket, lifetime).await {
                    current.set(None);
                }
            });
            timer.set(Some(task));
        } else {
            deadline.cancel();
        }
    });

    rsx! {
        {children}
        if let Some(toast) = toaster.current() {
            div {
                key: "{toast.id}",
                class: match toast.kind {
                    ToastKind::Success => "toast toast-success",
                    ToastKind::Error => "toast toast-error",
                },
                role: "status",
                onclick: move |_| toaster.dismiss(),
                "{toast.message}"
            }
        }
    }
}
