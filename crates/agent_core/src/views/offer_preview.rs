use std::fmt::Write as _;

use shared::protocol::Offer;

use super::{action_button, empty_state, html_escape};
use crate::{
    element::{Control, Element},
    error::AgentError,
};

const PREVIEW_LIMIT: usize = 3;

/// Compact teaser showing the first few offers and a "view offers" control.
pub struct OfferPreviewCard;

impl OfferPreviewCard {
    pub fn render(offers: &[Offer]) -> String {
        let mut out = String::from(r#"<aside class="me-agent-offer-preview">"#);
        let _ = write!(
            out,
            r#"<h3>{} {}</h3>"#,
            offers.len(),
            if offers.len() == 1 { "offer" } else { "offers" }
        );
        if offers.is_empty() {
            empty_state(&mut out, "New offers are on the way.");
        } else {
            out.push_str(r#"<ul class="me-agent-preview-list">"#);
            for offer in offers.iter().take(PREVIEW_LIMIT) {
                let _ = write!(
                    out,
                    r#"<li data-me-offer="{}"><strong>{}</strong> {}</li>"#,
                    html_escape(offer.offer_id.as_str()),
                    html_escape(&offer.brand_name),
                    html_escape(&offer.title)
                );
            }
            out.push_str("</ul>");
        }
        action_button(&mut out, Control::ViewOffers, "me-agent-view-offers", "View offers");
        out.push_str("</aside>");
        out
    }

    pub fn create(
        offers: &[Offer],
        on_view_offers: impl FnMut() + 'static,
    ) -> Result<Element, AgentError> {
        let mut element = Element::from_markup(Self::render(offers));
        element.bind(Control::ViewOffers, on_view_offers)?;
        Ok(element)
    }
}
