//! Insufficient-balance step. Has no confirm control.

use std::fmt::Write as _;

use shared::protocol::RewardBalance;

use super::{flow_header, html_escape, summary_row};
use crate::{
    element::{Control, Element},
    error::AgentError,
};

pub struct AffordabilityErrorView;

impl AffordabilityErrorView {
    pub const REQUIRED_CONTROLS: [Control; 2] = [Control::Back, Control::Close];

    pub fn render(reward: &RewardBalance, amount_needed: i64) -> Result<String, AgentError> {
        if amount_needed <= 0 {
            return Err(AgentError::AffordabilityViolation(format!(
                "shortfall must be positive, got {amount_needed}"
            )));
        }

        let currency = html_escape(&reward.currency);
        let shortfall = reward.units(amount_needed);
        let mut out = String::new();
        out.push_str(
            r#"<section class="me-agent-redemption me-agent-affordability-error" data-me-step="error" role="alert">"#,
        );
        flow_header(&mut out, "Not enough balance");
        let _ = write!(
            out,
            r#"<p class="me-agent-error-message">You need <strong data-me-field="amount-needed">{shortfall}</strong> more {currency} to redeem this offer.</p>"#
        );
        out.push_str(r#"<dl class="me-agent-summary">"#);
        summary_row(
            &mut out,
            "balance",
            &format!("{} balance", reward.program_name),
            &format!("{} {}", reward.balance_units(), reward.currency),
        );
        out.push_str("</dl></section>");
        Ok(out)
    }

    pub fn setup_listeners(
        element: &mut Element,
        on_back: impl FnMut() + 'static,
        on_close: impl FnMut() + 'static,
    ) -> Result<(), AgentError> {
        element.require_controls(&Self::REQUIRED_CONTROLS)?;
        element.bind(Control::Back, on_back)?;
        element.bind(Control::Close, on_close)
    }
}
