//! Markup renderers. Every `render` here is a pure function of its inputs.

pub mod affordability_error;
pub mod catalog;
pub mod confirmation;
pub mod offer_preview;

pub use affordability_error::AffordabilityErrorView;
pub use catalog::{BrandListView, CategoryListView, OfferLinks, OfferListView, ProductListView};
pub use confirmation::ConfirmationView;
pub use offer_preview::OfferPreviewCard;

use std::fmt::Write as _;

use crate::element::{Control, ACTION_ATTR};

pub(crate) fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn action_button(out: &mut String, control: Control, class: &str, label: &str) {
    let _ = write!(
        out,
        r#"<button type="button" class="{class}" {ACTION_ATTR}="{action}">{label}</button>"#,
        action = control.action(),
        label = html_escape(label),
    );
}

/// Header shared by both redemption steps: back on the left, close on the right.
pub(crate) fn flow_header(out: &mut String, title: &str) {
    out.push_str(r#"<header class="me-agent-header">"#);
    action_button(out, Control::Back, "me-agent-back", "Back");
    let _ = write!(out, "<h2>{}</h2>", html_escape(title));
    action_button(out, Control::Close, "me-agent-close", "Close");
    out.push_str("</header>");
}

pub(crate) fn summary_row(out: &mut String, field: &str, label: &str, value: &str) {
    let _ = write!(
        out,
        r#"<dt>{label}</dt><dd data-me-field="{field}">{value}</dd>"#,
        label = html_escape(label),
        value = html_escape(value),
    );
}

pub(crate) fn empty_state(out: &mut String, message: &str) {
    let _ = write!(
        out,
        r#"<p class="me-agent-empty">{}</p>"#,
        html_escape(message)
    );
}


#[cfg(test)]
#[path = "../tests/views_tests.rs"]
mod render_tests;
