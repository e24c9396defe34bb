//! "You are about to redeem" step.

use std::fmt::Write as _;

use shared::protocol::{OfferDetail, RewardBalance, SwapAmountResponse};

use super::{action_button, flow_header, html_escape, summary_row};
use crate::{
    element::{Control, Element},
    error::AgentError,
};

pub struct ConfirmationView;

impl ConfirmationView {
    pub const REQUIRED_CONTROLS: [Control; 3] = [Control::Back, Control::Close, Control::Confirm];

    /// Renders the confirmation markup. Performs no swap; the host does that
    /// after `on_confirm` fires. Refuses to render a swap the balance does
    /// not cover.
    pub fn render(
        reward: &RewardBalance,
        swap_amount: &SwapAmountResponse,
        offer_detail: &OfferDetail,
    ) -> Result<String, AgentError> {
        if reward.balance < swap_amount.amount {
            return Err(AgentError::AffordabilityViolation(format!(
                "balance {} does not cover swap amount {}",
                reward.balance, swap_amount.amount
            )));
        }

        let currency = &reward.currency;
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<section class="me-agent-redemption me-agent-confirmation" data-me-step="confirmation" data-me-offer="{}">"#,
            html_escape(offer_detail.offer_id.as_str())
        );
        flow_header(&mut out, "Confirm redemption");

        out.push_str(r#"<div class="me-agent-offer">"#);
        if let Some(image_url) = &offer_detail.image_url {
            let _ = write!(
                out,
                r#"<img class="me-agent-offer-image" src="{}" alt="{}">"#,
                html_escape(image_url),
                html_escape(&offer_detail.brand_name)
            );
        }
        let _ = write!(
            out,
            r#"<h3>{}</h3><p class="me-agent-offer-title">{}</p><p class="me-agent-offer-description">{}</p>"#,
            html_escape(&offer_detail.brand_name),
            html_escape(&offer_detail.title),
            html_escape(&offer_detail.description)
        );
        if let Some(valid_until) = offer_detail.valid_until {
            let _ = write!(
                out,
                r#"<p class="me-agent-offer-expiry">Valid until {}</p>"#,
                valid_until.format("%Y-%m-%d")
            );
        }
        if let Some(terms) = &offer_detail.terms {
            let _ = write!(
                out,
                r#"<p class="me-agent-offer-terms">{}</p>"#,
                html_escape(terms)
            );
        }
        out.push_str("</div>");

        out.push_str(r#"<dl class="me-agent-summary">"#);
        summary_row(
            &mut out,
            "balance",
            &format!("{} balance", reward.program_name),
            &format!("{} {currency}", reward.balance_units()),
        );
        summary_row(
            &mut out,
            "swap-amount",
            "You swap",
            &format!("{} {currency}", reward.units(swap_amount.amount)),
        );
        if swap_amount.fee > 0 {
            summary_row(
                &mut out,
                "fee",
                "Included fee",
                &format!("{} {currency}", reward.units(swap_amount.fee)),
            );
        }
        summary_row(
            &mut out,
            "receive-amount",
            "You receive",
            &format!(
                "{} {}",
                swap_amount.receive_units(),
                swap_amount.receive_currency
            ),
        );
        if let Some(rate) = &swap_amount.rate {
            summary_row(&mut out, "rate", "Rate", rate);
        }
        summary_row(
            &mut out,
            "remaining",
            "Balance after",
            &format!(
                "{} {currency}",
                reward.units(reward.balance - swap_amount.amount)
            ),
        );
        out.push_str("</dl>");

        out.push_str(r#"<footer class="me-agent-actions">"#);
        action_button(&mut out, Control::Confirm, "me-agent-confirm", "Confirm");
        out.push_str("</footer></section>");
        Ok(out)
    }

    /// Binds the three controls independently. All three regions must exist
    /// before anything is bound. Confirm is once-guarded per element.
    pub fn setup_listeners(
        element: &mut Element,
        on_back: impl FnMut() + 'static,
        on_close: impl FnMut() + 'static,
        on_confirm: impl FnMut() + 'static,
    ) -> Result<(), AgentError> {
        element.require_controls(&Self::REQUIRED_CONTROLS)?;
        element.bind(Control::Back, on_back)?;
        element.bind(Control::Close, on_close)?;
        element.bind_once(Control::Confirm, on_confirm)
    }
}
