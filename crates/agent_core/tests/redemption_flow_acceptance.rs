use std::{cell::RefCell, rc::Rc};

use agent_core::{
    AgentError, Control, FlowCallbacks, FlowCommand, FlowStep, MeAgent, MeAgentConfig,
    RedemptionFlowController, StaticCatalog,
};
use shared::{
    domain::{OfferId, RewardId},
    protocol::{Catalog, OfferDetail, RewardBalance, SwapAmountResponse},
};

fn reward(balance: i64) -> RewardBalance {
    RewardBalance {
        reward_id: RewardId::from("rw-acceptance"),
        program_name: "Points".into(),
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
        receive_amount: 15,
        receive_currency: "USDC".into(),
        receive_decimals: 0,
        fee: 0,
        rate: None,
    }
}

fn offer() -> OfferDetail {
    OfferDetail {
        offer_id: OfferId::from("of-acceptance"),
        brand_name: "Acme".into(),
        title: "Gift card".into(),
        description: "A $15 gift card".into(),
        terms: None,
        valid_until: None,
        image_url: None,
    }
}

/// Records commands the way a host queues them for its own loop.
fn recording_callbacks(log: &Rc<RefCell<Vec<FlowCommand>>>) -> FlowCallbacks {
    let (back, close, confirm) = (Rc::clone(log), Rc::clone(log), Rc::clone(log));
    FlowCallbacks::new(
        move || back.borrow_mut().push(FlowCommand::Back),
        move || close.borrow_mut().push(FlowCommand::Close),
        move || confirm.borrow_mut().push(FlowCommand::Confirm),
    )
}

#[test]
fn affordable_redemption_confirms_once() {
    let mut render =
        RedemptionFlowController::open(&reward(500), &swap(300), Some(&offer())).expect("open");
    assert_eq!(render.state.step(), FlowStep::Confirmation);
    assert!(render.markup().contains("300"));
    assert!(render.markup().contains("500"));

    let log = Rc::new(RefCell::new(Vec::new()));
    RedemptionFlowController::attach(&mut render, recording_callbacks(&log)).expect("attach");
    render.element.click(Control::Confirm);
    render.element.click(Control::Confirm);

    assert_eq!(*log.borrow(), vec![FlowCommand::Confirm]);
}

#[test]
fn unaffordable_redemption_shows_shortfall_without_confirm() {
    let mut render =
        RedemptionFlowController::open(&reward(100), &swap(300), Some(&offer())).expect("open");
    assert_eq!(render.state.amount_needed(), Some(200));
    assert!(render.markup().contains(">200</strong>"));
    assert!(!render.markup().contains(r#"data-me-action="confirm""#));

    let log = Rc::new(RefCell::new(Vec::new()));
    RedemptionFlowController::attach(&mut render, recording_callbacks(&log)).expect("attach");
    assert!(!render.element.is_bound(Control::Confirm));
    assert!(!render.element.click(Control::Confirm));
    assert!(log.borrow().is_empty());
}

#[test]
fn host_step_bookkeeping_follows_recorded_gestures() {
    let mut render =
        RedemptionFlowController::open(&reward(100), &swap(300), Some(&offer())).expect("open");
    let log = Rc::new(RefCell::new(Vec::new()));
    RedemptionFlowController::attach(&mut render, recording_callbacks(&log)).expect("attach");

    let mut step = FlowStep::Start
        .apply(FlowCommand::Open {
            affordable: render.state.is_affordable(),
        })
        .expect("open step");
    render.element.click(Control::Back);
    for command in log.borrow_mut().drain(..) {
        step = step.apply(command).expect("apply");
    }
    assert_eq!(step, FlowStep::Start);
}

#[test]
fn destroy_without_init_is_safe() {
    let mut agent = MeAgent::new();
    agent.destroy();
    assert_eq!(agent.listener_count(), 0);
}

#[tokio::test]
async fn agent_open_attach_destroy_round() {
    let config = MeAgentConfig {
        partner_id: "acceptance".into(),
        callback_url: "https://host.example.com/cb".into(),
        ..MeAgentConfig::default()
    };
    let mut agent = MeAgent::start(config, &StaticCatalog::new(Catalog::default()))
        .await
        .expect("start");

    let err = agent
        .open_redemption(&reward(500), &swap(300), None)
        .expect_err("missing offer");
    assert!(matches!(err, AgentError::InvalidInput(_)));
    assert_eq!(agent.mounted_count(), 0, "nothing mounted on invalid input");

    let log = Rc::new(RefCell::new(Vec::new()));
    let node = agent
        .open_redemption(&reward(500), &swap(300), Some(&offer()))
        .expect("open");
    agent
        .attach_redemption(node, recording_callbacks(&log))
        .expect("attach");
    agent
        .attach_redemption(node, recording_callbacks(&log))
        .expect("attach again");
    assert_eq!(agent.listener_count(), 3);

    agent.click(node, Control::Confirm).expect("click");
    agent.click(node, Control::Confirm).expect("click");
    assert_eq!(*log.borrow(), vec![FlowCommand::Confirm]);

    agent.destroy();
    agent.destroy();
    assert_eq!(agent.listener_count(), 0);
    assert!(matches!(
        agent.click(node, Control::Back),
        Err(AgentError::NotInitialized)
    ));
}
