//! Small form primitives shared by the dialogs.

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Ghost,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn btn-primary",
            ButtonVariant::Ghost => "btn btn-ghost",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default = "button".to_string())] r#type: String,
    #[props(default)] disabled: bool,
    #[props(default)] class: String,
    #[props(default)] onclick: EventHandler<MouseEvent>,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "{variant.class()} {class}",
            r#type: "{r#type}",
            disabled,
            onclick: move |evt| onclick.call(evt),
            {children}
        }
    }
}

#[component]
pub fn Label(html_for: String, children: Element) -> Element {
    rsx! {
        label { class: "field-label", r#for: "{html_for}", {children} }
    }
}

#[component]
pub fn Input(
    id: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] autocomplete: String,
    #[props(default)] disabled: bool,
    value: String,
    oninput: EventHandler<FormEvent>,
) -> Element {
    rsx! {
        input {
            id: "{id}",
            class: "field-input",
            r#type: "{r#type}",
            autocomplete: "{autocomplete}",
            disabled,
            value: "{value}",
            oninput: move |evt| oninput.call(evt),
        }
    }
}

#[component]
pub fn Textarea(
    id: String,
    #[props(default = 8)] rows: u32,
    #[props(default)] disabled: bool,
    value: String,
    oninput: EventHandler<FormEvent>,
) -> Element {
    rsx! {
        textarea {
            id: "{id}",
            class: "field-input field-textarea",
            rows: "{rows}",
            disabled,
            value: "{value}",
            oninput: move |evt| oninput.call(evt),
        }
    }
}

#[component]
pub fn Spinner(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div { class: "spinner", role: "status",
            span { class: "spinner-dot" }
            span { class: "spinner-label", "{label}" }
        }
    }
}

/// Inline message under a form. Renders nothing when `message` is empty.
#[component]
pub fn FormMessage(message: String, #[props(default)] success: bool) -> Element {
    if message.is_empty() {
        return rsx! {};
    }
    rsx! {
        p {
            class: if success { "form-message form-success" } else { "form-message form-error" },
            "{message}"
        }
    }
}
