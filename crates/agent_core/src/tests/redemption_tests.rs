use super::*;

use std::{cell::Cell, rc::Rc};

use shared::domain::{OfferId, RewardId};

use crate::{controller::FlowCommand, element::Control};

fn reward(balance: i64) -> RewardBalance {
    RewardBalance {
        reward_id: RewardId::from("rw-1"),
        program_name: "SkyMiles".into(),
        balance,
        currency: "PTS".into(),
        decimals: 0,
        image_url: None,
    }
}

fn swap(amount: i64) -> SwapAmountResponse {
    SwapAmountResponse {
        amount,
        currency: "PTS".into(),
        receive_amount: amount / 10,
        receive_currency: "USDC".into(),
        receive_decimals: 0,
        fee: 0,
        rate: Some("10 PTS = 1 USDC".into()),
    }
}

fn offer() -> OfferDetail {
    OfferDetail {
        offer_id: OfferId::from("of-42"),
        brand_name: "Acme Coffee".into(),
        title: "Free latte".into(),
        description: "Any size, any milk".into(),
        terms: None,
        valid_until: None,
        image_url: None,
    }
}

#[derive(Default, Clone)]
struct Calls {
    back: Rc<Cell<u32>>,
    close: Rc<Cell<u32>>,
    confirm: Rc<Cell<u32>>,
}

impl Calls {
    fn callbacks(&self) -> FlowCallbacks {
        let (back, close, confirm) = (
            Rc::clone(&self.back),
            Rc::clone(&self.close),
            Rc::clone(&self.confirm),
        );
        FlowCallbacks::new(
            move || back.set(back.get() + 1),
            move || close.set(close.get() + 1),
            move || confirm.set(confirm.get() + 1),
        )
    }

    fn counts(&self) -> (u32, u32, u32) {
        (self.back.get(), self.close.get(), self.confirm.get())
    }
}

#[test]
fn affordable_when_balance_covers_cost_exactly() {
    for (balance, cost) in [(300, 300), (301, 300), (1_000_000, 1)] {
        let state = RedemptionFlowController::evaluate(&reward(balance), &swap(cost), Some(&offer()))
            .expect("valid inputs");
        assert!(state.is_affordable(), "{balance} >= {cost}");
        assert_eq!(state.amount_needed(), None);
        assert_eq!(state.step(), FlowStep::Confirmation);
    }
}

#[test]
fn unaffordable_reports_positive_shortfall() {
    for (balance, cost) in [(0, 1), (299, 300), (100, 300)] {
        let state = RedemptionFlowController::evaluate(&reward(balance), &swap(cost), Some(&offer()))
            .expect("valid inputs");
        assert_eq!(state.step(), FlowStep::Error);
        assert_eq!(state.amount_needed(), Some(cost - balance));
        assert!(state.amount_needed().unwrap_or_default() > 0);
    }
}

#[test]
fn rejects_missing_offer_before_render() {
    let err = RedemptionFlowController::open(&reward(500), &swap(300), None)
        .expect_err("offer is required");
    assert!(matches!(err, AgentError::InvalidInput(_)));
}

#[test]
fn rejects_negative_balance() {
    let err = RedemptionFlowController::open(&reward(-1), &swap(300), Some(&offer()))
        .expect_err("negative balance");
    assert!(matches!(err, AgentError::InvalidInput(ref msg) if msg.contains("negative")));
}

#[test]
fn rejects_non_positive_swap_and_bad_fee() {
    assert!(RedemptionFlowController::open(&reward(500), &swap(0), Some(&offer())).is_err());

    let mut with_fee = swap(300);
    with_fee.fee = 301;
    assert!(RedemptionFlowController::open(&reward(500), &with_fee, Some(&offer())).is_err());
}

#[test]
fn rejects_currency_mismatch() {
    let mut priced_elsewhere = swap(300);
    priced_elsewhere.currency = "USD".into();
    let err = RedemptionFlowController::open(&reward(500), &priced_elsewhere, Some(&offer()))
        .expect_err("currency mismatch");
    assert!(matches!(err, AgentError::InvalidInput(_)));
}

#[test]
fn rejects_unsupported_decimal_precision() {
    let mut fine_grained = reward(5_000);
    fine_grained.decimals = 20;
    let err = RedemptionFlowController::open(&fine_grained, &swap(300), Some(&offer()))
        .expect_err("reward decimals");
    assert!(matches!(err, AgentError::InvalidInput(ref msg) if msg.contains("decimals")));

    let mut quote = swap(300);
    quote.receive_decimals = 20;
    let err = RedemptionFlowController::open(&reward(5_000), &quote, Some(&offer()))
        .expect_err("receive decimals");
    assert!(matches!(err, AgentError::InvalidInput(_)));

    let mut at_cap = reward(5_000);
    at_cap.decimals = 18;
    assert!(RedemptionFlowController::evaluate(&at_cap, &swap(300), Some(&offer())).is_ok());
}

#[test]
fn error_render_has_no_confirm_control_and_ignores_on_confirm() {
    let mut render = RedemptionFlowController::open(&reward(100), &swap(300), Some(&offer()))
        .expect("open");
    assert!(!render.element.has_control(Control::Confirm));

    let calls = Calls::default();
    RedemptionFlowController::attach(&mut render, calls.callbacks()).expect("attach");
    assert!(!render.element.click(Control::Confirm));
    assert_eq!(render.element.listener_count(), 2);
    assert_eq!(calls.counts(), (0, 0, 0));
}

#[test]
fn back_click_fires_only_back() {
    let mut render = RedemptionFlowController::open(&reward(500), &swap(300), Some(&offer()))
        .expect("open");
    let calls = Calls::default();
    RedemptionFlowController::attach(&mut render, calls.callbacks()).expect("attach");

    assert!(render.element.click(Control::Back));
    assert_eq!(calls.counts(), (1, 0, 0));
}

#[test]
fn double_attach_then_confirm_fires_once() {
    let mut render = RedemptionFlowController::open(&reward(500), &swap(300), Some(&offer()))
        .expect("open");
    let calls = Calls::default();
    RedemptionFlowController::attach(&mut render, calls.callbacks()).expect("first attach");
    RedemptionFlowController::attach(&mut render, calls.callbacks()).expect("second attach");

    render.element.click(Control::Confirm);
    render.element.click(Control::Confirm);
    render.element.click(Control::Confirm);

    assert_eq!(calls.counts(), (0, 0, 1));
    assert_eq!(render.element.listener_count(), 3);
}

#[test]
fn each_open_yields_a_fresh_node() {
    let a = RedemptionFlowController::open(&reward(500), &swap(300), Some(&offer())).expect("a");
    let b = RedemptionFlowController::open(&reward(500), &swap(300), Some(&offer())).expect("b");
    assert_ne!(a.node_id(), b.node_id());
    assert_eq!(a.markup(), b.markup());
    assert_eq!(a.state, b.state);
}

#[test]
fn step_transitions_follow_the_flow() {
    let step = FlowStep::Start
        .apply(FlowCommand::Open { affordable: true })
        .expect("open");
    assert_eq!(step, FlowStep::Confirmation);
    assert_eq!(step.apply(FlowCommand::Back).expect("back"), FlowStep::Start);
    assert_eq!(
        step.apply(FlowCommand::Confirm).expect("confirm"),
        FlowStep::Confirmed
    );
    assert_eq!(step.apply(FlowCommand::Close).expect("close"), FlowStep::Closed);

    let error = FlowStep::Start
        .apply(FlowCommand::Open { affordable: false })
        .expect("open");
    assert_eq!(error, FlowStep::Error);
    assert!(matches!(
        error.apply(FlowCommand::Confirm),
        Err(AgentError::AffordabilityViolation(_))
    ));
    assert!(error.apply(FlowCommand::Close).expect("close").is_terminal());
}

#[test]
fn closed_is_terminal() {
    for command in [
        FlowCommand::Back,
        FlowCommand::Close,
        FlowCommand::Confirm,
        FlowCommand::Open { affordable: true },
    ] {
        assert!(matches!(
            FlowStep::Closed.apply(command),
            Err(AgentError::InvalidTransition { from: FlowStep::Closed, .. })
        ));
    }
}
