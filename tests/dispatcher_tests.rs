//! Order dispatch from the prediction panel.

use std::sync::Arc;
use std::time::Duration;

use juspredict::application::{OrderAction, OrderPanel, SessionStore};
use juspredict::domain::{Balance, OrderId, Prediction};
use juspredict::error::{Error, ValidationError};
use juspredict::port::OrderReceipt;
use juspredict::testkit::domain::{prediction, question, session};
use juspredict::testkit::gateway::ScriptedGateway;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn panel(gateway: &Arc<ScriptedGateway>, session: &Arc<SessionStore>) -> OrderPanel {
    OrderPanel::new(
        gateway.clone(),
        Arc::clone(session),
        "e1".into(),
        question("q1", &[("Yes", dec!(55)), ("No", dec!(45))]),
    )
}

fn validation(err: Error) -> ValidationError {
    match err {
        Error::Validation(v) => v,
        other => panic!("expected a validation error, got {other}"),
    }
}

fn matched() -> Prediction {
    Prediction {
        matched_amt: Some(dec!(8)),
        exit_percentage: Some(dec!(70)),
        ..prediction("p1", "q1", "e1", "PREDICTION_STATUS_MATCHED")
    }
}

#[tokio::test]
async fn create_requires_login() {
    let gateway = Arc::new(ScriptedGateway::new().with_balance(Balance::new(dec!(100))));
    let (_, session) = session(None);
    let panel = panel(&gateway, &session);
    panel.select_outcome("Yes");
    panel.set_amount(dec!(10));

    let err = panel.dispatch(OrderAction::Create).await.unwrap_err();

    assert_eq!(validation(err), ValidationError::NotLoggedIn);
    assert_eq!(panel.state().error.as_deref(), Some("Log in to trade"));
    assert_eq!(gateway.calls("create_order"), 0);
}

#[tokio::test]
async fn create_requires_outcome_and_positive_amount() {
    let gateway = Arc::new(ScriptedGateway::new().with_balance(Balance::new(dec!(100))));
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);

    panel.set_amount(dec!(10));
    let err = panel.dispatch(OrderAction::Create).await.unwrap_err();
    assert_eq!(validation(err), ValidationError::InvalidSelection);

    panel.select_outcome("Yes");
    panel.set_amount(Decimal::ZERO);
    let err = panel.dispatch(OrderAction::Create).await.unwrap_err();
    assert_eq!(validation(err), ValidationError::InvalidSelection);

    assert_eq!(gateway.calls("create_order"), 0);
}

#[tokio::test]
async fn create_rejects_amount_above_balance() {
    let gateway = Arc::new(ScriptedGateway::new().with_balance(Balance::new(dec!(5))));
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.load().await;
    panel.select_outcome("Yes");
    panel.set_amount(dec!(10));

    let err = panel.dispatch(OrderAction::Create).await.unwrap_err();

    assert_eq!(validation(err), ValidationError::InsufficientBalance);
    assert_eq!(panel.state().error.as_deref(), Some("Insufficient balance"));
    assert_eq!(gateway.calls("create_order"), 0);
}

#[tokio::test]
async fn create_submits_implied_confidence_and_refreshes() {
    let placed = prediction("p9", "q1", "e1", "PREDICTION_STATUS_ACCEPTED");
    let gateway = Arc::new(
        ScriptedGateway::new()
            .with_balance(Balance::new(dec!(100)))
            .with_receipt(OrderReceipt {
                order_id: Some("o9".into()),
                prediction_id: Some("p9".into()),
            }),
    );
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.load().await;
    panel.select_outcome("Yes");
    panel.set_amount(dec!(20));
    gateway.set_predictions(vec![placed.clone()]);

    panel.dispatch(OrderAction::Create).await.unwrap();

    let created = gateway.recorded().created;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].outcome, "Yes");
    assert_eq!(created[0].amount, dec!(20));
    assert_eq!(created[0].percentage, dec!(55));

    let state = panel.state();
    assert_eq!(state.notice.as_deref(), Some("Prediction placed"));
    assert_eq!(state.prediction, Some(placed));
    assert!(state.outcome.is_none());
    assert_eq!(gateway.calls("balance"), 2);
    assert_eq!(gateway.calls("prediction_by_id"), 1);
    assert_eq!(panel.available_action().unwrap(), Some(OrderAction::Cancel));
}

#[tokio::test]
async fn confidence_override_wins() {
    let gateway = Arc::new(ScriptedGateway::new().with_balance(Balance::new(dec!(100))));
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.select_outcome("No");
    panel.set_amount(dec!(10));
    panel.set_confidence(Some(dec!(80)));

    panel.dispatch(OrderAction::Create).await.unwrap();

    assert_eq!(gateway.recorded().created[0].percentage, dec!(80));
}

#[tokio::test]
async fn cancel_requires_an_order_id() {
    let gateway = Arc::new(ScriptedGateway::new());
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.set_prediction(Some(Prediction {
        order_id: None,
        ..prediction("p1", "q1", "e1", "PREDICTION_STATUS_ACCEPTED")
    }));

    let err = panel.dispatch(OrderAction::Cancel).await.unwrap_err();

    assert_eq!(validation(err), ValidationError::MissingOrderId);
    assert_eq!(gateway.calls("cancel_order"), 0);
}

#[tokio::test]
async fn cancel_sends_the_order_id() {
    let gateway = Arc::new(ScriptedGateway::new().with_balance(Balance::new(dec!(50))));
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.set_prediction(Some(prediction(
        "p1",
        "q1",
        "e1",
        "PREDICTION_STATUS_ACCEPTED",
    )));

    panel.dispatch(OrderAction::Cancel).await.unwrap();

    assert_eq!(gateway.recorded().cancelled, vec![OrderId::new("order-p1")]);
    assert_eq!(
        panel.state().notice.as_deref(),
        Some("Cancellation requested")
    );
}

#[tokio::test]
async fn matched_prediction_only_offers_exit() {
    let gateway = Arc::new(ScriptedGateway::new());
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.set_prediction(Some(matched()));
    panel.select_outcome("Yes");
    panel.set_amount(dec!(10));

    assert_eq!(panel.available_action().unwrap(), Some(OrderAction::Exit));
    for action in [OrderAction::Create, OrderAction::Cancel] {
        let err = panel.dispatch(action).await.unwrap_err();
        assert!(matches!(
            validation(err),
            ValidationError::ActionUnavailable { .. }
        ));
    }
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn exit_uses_matched_amount_and_exit_percentage() {
    let gateway = Arc::new(ScriptedGateway::new().with_balance(Balance::new(dec!(50))));
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.set_prediction(Some(matched()));

    assert_eq!(panel.submit().await.unwrap(), OrderAction::Exit);

    let exited = gateway.recorded().exited;
    assert_eq!(exited.len(), 1);
    assert_eq!(exited[0].amount, dec!(8));
    assert_eq!(exited[0].percentage, dec!(70));
    assert_eq!(exited[0].order_id, Some("order-p1".into()));
}

#[tokio::test]
async fn settled_prediction_offers_nothing() {
    let gateway = Arc::new(ScriptedGateway::new());
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.set_prediction(Some(prediction(
        "p1",
        "q1",
        "e1",
        "PREDICTION_STATUS_SETTLED",
    )));

    assert_eq!(panel.available_action().unwrap(), None);
    assert!(panel.submit().await.is_err());
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn unknown_status_blocks_dispatch() {
    let gateway = Arc::new(ScriptedGateway::new());
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.set_prediction(Some(prediction("p1", "q1", "e1", "PREDICTION_STATUS_VOIDED")));

    assert!(matches!(
        panel.available_action(),
        Err(Error::Domain(_))
    ));
    assert!(panel.dispatch(OrderAction::Create).await.is_err());
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn backend_rejection_sets_panel_error() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .with_balance(Balance::new(dec!(100)))
            .with_failing_orders(),
    );
    let (_, session) = session(Some("tok"));
    let panel = panel(&gateway, &session);
    panel.select_outcome("Yes");
    panel.set_amount(dec!(10));

    assert!(panel.dispatch(OrderAction::Create).await.is_err());

    assert_eq!(
        panel.state().error.as_deref(),
        Some("Failed to create prediction")
    );
    assert!(!panel.is_submitting());
}

#[tokio::test]
async fn second_submit_while_in_flight_is_rejected() {
    let gateway = Arc::new(ScriptedGateway::new().with_balance(Balance::new(dec!(100))));
    let gate = gateway.hold();
    let (_, session) = session(Some("tok"));
    let panel = Arc::new(panel(&gateway, &session));
    panel.select_outcome("Yes");
    panel.set_amount(dec!(10));

    let first = {
        let panel = Arc::clone(&panel);
        tokio::spawn(async move { panel.dispatch(OrderAction::Create).await })
    };
    while gateway.calls("create_order") == 0 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert!(panel.is_submitting());

    let err = panel.dispatch(OrderAction::Create).await.unwrap_err();
    assert_eq!(validation(err), ValidationError::SubmissionInFlight);

    gate.add_permits(1);
    first.await.unwrap().unwrap();

    assert_eq!(gateway.calls("create_order"), 1);
    assert!(!panel.is_submitting());
}
