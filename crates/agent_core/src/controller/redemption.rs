//! Redemption flow: affordability check, view selection, listener wiring.

use shared::{
    domain::MAX_DECIMALS,
    protocol::{OfferDetail, RewardBalance, SwapAmountResponse},
};
use tracing::{debug, info};

use super::events::FlowStep;
use crate::{
    element::{Element, Handler, NodeId},
    error::AgentError,
    views::{AffordabilityErrorView, ConfirmationView},
};

/// The rendered state of one `open` call. `amount_needed` only exists on
/// the error variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Confirmation {
        reward: RewardBalance,
        swap_amount: SwapAmountResponse,
        offer_detail: OfferDetail,
    },
    Error {
        reward: RewardBalance,
        swap_amount: SwapAmountResponse,
        offer_detail: OfferDetail,
        amount_needed: i64,
    },
}

impl FlowState {
    pub fn step(&self) -> FlowStep {
        match self {
            Self::Confirmation { .. } => FlowStep::Confirmation,
            Self::Error { .. } => FlowStep::Error,
        }
    }

    pub fn amount_needed(&self) -> Option<i64> {
        match self {
            Self::Confirmation { .. } => None,
            Self::Error { amount_needed, .. } => Some(*amount_needed),
        }
    }

    pub fn is_affordable(&self) -> bool {
        matches!(self, Self::Confirmation { .. })
    }

    pub fn reward(&self) -> &RewardBalance {
        match self {
            Self::Confirmation { reward, .. } | Self::Error { reward, .. } => reward,
        }
    }

    pub fn offer_detail(&self) -> &OfferDetail {
        match self {
            Self::Confirmation { offer_detail, .. } | Self::Error { offer_detail, .. } => {
                offer_detail
            }
        }
    }

    fn render(&self) -> Result<String, AgentError> {
        match self {
            Self::Confirmation {
                reward,
                swap_amount,
                offer_detail,
            } => ConfirmationView::render(reward, swap_amount, offer_detail),
            Self::Error {
                reward,
                amount_needed,
                ..
            } => AffordabilityErrorView::render(reward, *amount_needed),
        }
    }
}

/// Output of [`RedemptionFlowController::open`]: the state plus its live node.
#[derive(Debug)]
pub struct FlowRender {
    pub state: FlowState,
    pub element: Element,
}

impl FlowRender {
    pub fn node_id(&self) -> NodeId {
        self.element.id()
    }

    pub fn markup(&self) -> &str {
        self.element.markup()
    }
}

/// Host callbacks. `on_confirm` is dropped unused for the error step.
pub struct FlowCallbacks {
    pub on_back: Handler,
    pub on_close: Handler,
    pub on_confirm: Handler,
}

impl FlowCallbacks {
    pub fn new(
        on_back: impl FnMut() + 'static,
        on_close: impl FnMut() + 'static,
        on_confirm: impl FnMut() + 'static,
    ) -> Self {
        Self {
            on_back: Box::new(on_back),
            on_close: Box::new(on_close),
            on_confirm: Box::new(on_confirm),
        }
    }
}

pub struct RedemptionFlowController;

impl RedemptionFlowController {
    /// Validates inputs and decides the step without rendering anything.
    pub fn evaluate(
        reward: &RewardBalance,
        swap_amount: &SwapAmountResponse,
        offer_detail: Option<&OfferDetail>,
    ) -> Result<FlowState, AgentError> {
        let offer_detail = validate_inputs(reward, swap_amount, offer_detail)?;

        let state = if reward.balance >= swap_amount.amount {
            FlowState::Confirmation {
                reward: reward.clone(),
                swap_amount: swap_amount.clone(),
                offer_detail: offer_detail.clone(),
            }
        } else {
            FlowState::Error {
                reward: reward.clone(),
                swap_amount: swap_amount.clone(),
                offer_detail: offer_detail.clone(),
                amount_needed: swap_amount.amount - reward.balance,
            }
        };
        Ok(state)
    }

    pub fn open(
        reward: &RewardBalance,
        swap_amount: &SwapAmountResponse,
        offer_detail: Option<&OfferDetail>,
    ) -> Result<FlowRender, AgentError> {
        let state = Self::evaluate(reward, swap_amount, offer_detail)?;
        let element = Element::from_markup(state.render()?);
        info!(
            node = %element.id(),
            step = %state.step(),
            offer_id = %state.offer_detail().offer_id,
            balance = reward.balance,
            cost = swap_amount.amount,
            "redemption flow opened"
        );
        Ok(FlowRender { state, element })
    }

    /// Installs the listeners matching the rendered step. Safe to call again
    /// on the same render; previous handlers are replaced.
    pub fn attach(render: &mut FlowRender, callbacks: FlowCallbacks) -> Result<(), AgentError> {
        let FlowCallbacks {
            on_back,
            on_close,
            on_confirm,
        } = callbacks;
        match render.state {
            FlowState::Confirmation { .. } => ConfirmationView::setup_listeners(
                &mut render.element,
                on_back,
                on_close,
                on_confirm,
            )?,
            FlowState::Error { .. } => {
                AffordabilityErrorView::setup_listeners(&mut render.element, on_back, on_close)?
            }
        }
        debug!(
            node = %render.element.id(),
            step = %render.state.step(),
            listeners = render.element.listener_count(),
            "redemption listeners attached"
        );
        Ok(())
    }
}

fn validate_inputs<'a>(
    reward: &RewardBalance,
    swap_amount: &SwapAmountResponse,
    offer_detail: Option<&'a OfferDetail>,
) -> Result<&'a OfferDetail, AgentError> {
    let offer_detail =
        offer_detail.ok_or_else(|| AgentError::invalid_input("offer detail is required"))?;
    if offer_detail.offer_id.as_str().trim().is_empty() {
        return Err(AgentError::invalid_input("offer detail has an empty offer_id"));
    }
    if reward.balance < 0 {
        return Err(AgentError::invalid_input(format!(
            "reward balance must not be negative, got {}",
            reward.balance
        )));
    }
    if swap_amount.amount <= 0 {
        return Err(AgentError::invalid_input(format!(
            "swap amount must be positive, got {}",
            swap_amount.amount
        )));
    }
    if swap_amount.fee < 0 || swap_amount.fee > swap_amount.amount {
        return Err(AgentError::invalid_input(format!(
            "swap fee {} must be within 0..={}",
            swap_amount.fee, swap_amount.amount
        )));
    }
    if swap_amount.receive_amount < 0 {
        return Err(AgentError::invalid_input(format!(
            "receive amount must not be negative, got {}",
            swap_amount.receive_amount
        )));
    }
    if reward.decimals > MAX_DECIMALS || swap_amount.receive_decimals > MAX_DECIMALS {
        return Err(AgentError::invalid_input(format!(
            "decimals must be at most {MAX_DECIMALS}, got {} and {}",
            reward.decimals, swap_amount.receive_decimals
        )));
    }
    if !reward.currency.eq_ignore_ascii_case(&swap_amount.currency) {
        return Err(AgentError::invalid_input(format!(
            "swap is priced in {} but the reward balance is in {}",
            swap_amount.currency, reward.currency
        )));
    }
    Ok(offer_detail)
}

#[cfg(test)]
#[path = "../tests/redemption_tests.rs"]
mod tests;
