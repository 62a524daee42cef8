//! Fetch-and-group behavior of the prediction grouper.

use std::sync::Arc;

use juspredict::application::PredictionGrouper;
use juspredict::domain::{EventId, QuestionId, TimeInForce};
use juspredict::testkit::domain::{detail, event, prediction, question, session};
use juspredict::testkit::gateway::ScriptedGateway;
use rust_decimal_macros::dec;

fn scripted() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_detail(detail(
            event("e1", ("Lions", "Tigers"), (60, 40)),
            vec![question("q1", &[("Yes", dec!(55)), ("No", dec!(45))])],
        ))
        .with_detail(detail(
            event("e2", ("Hawks", "Owls"), (50, 50)),
            vec![question("q2", &[("Yes", dec!(30))])],
        ))
        .with_predictions(vec![
            prediction("p1", "q1", "e1", "PREDICTION_STATUS_ACCEPTED"),
            prediction("p2", "q2", "e2", "PREDICTION_STATUS_MATCHED"),
            prediction("p3", "q1", "e1", "PREDICTION_STATUS_MATCHED"),
        ])
}

#[tokio::test]
async fn no_token_means_no_requests() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(None);
    let grouper = PredictionGrouper::new(gateway.clone(), session);

    let grouped = grouper.fetch_grouped(TimeInForce::Upcoming, None).await;

    assert!(grouped.is_empty());
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn groups_by_question_and_fetches_each_event_once() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(Some("tok"));
    let grouper = PredictionGrouper::new(gateway.clone(), session);

    let grouped = grouper.fetch_grouped(TimeInForce::Upcoming, None).await;

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped.prediction_count(), 3);
    assert_eq!(
        grouped.question_ids(),
        &[QuestionId::new("q1"), QuestionId::new("q2")]
    );
    assert_eq!(grouped.get(&QuestionId::new("q1")).map(<[_]>::len), Some(2));
    assert_eq!(gateway.calls("list_predictions"), 1);
    assert_eq!(gateway.calls("get_event"), 2);
    assert!(grouped.event(&EventId::new("e1")).is_some());
}

#[tokio::test]
async fn grouping_twice_gives_the_same_result() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(Some("tok"));
    let grouper = PredictionGrouper::new(gateway, session);

    let first = grouper.fetch_grouped(TimeInForce::Upcoming, None).await;
    let second = grouper.fetch_grouped(TimeInForce::Upcoming, None).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_event_is_left_out_but_predictions_stay() {
    let gateway = Arc::new(scripted().with_failing_event("e2"));
    let (_, session) = session(Some("tok"));
    let grouper = PredictionGrouper::new(gateway, session);

    let grouped = grouper.fetch_grouped(TimeInForce::Upcoming, None).await;

    assert_eq!(grouped.prediction_count(), 3);
    assert!(grouped.event(&EventId::new("e1")).is_some());
    assert!(grouped.event(&EventId::new("e2")).is_none());
}

#[tokio::test]
async fn list_failure_yields_empty_grouping() {
    let gateway = Arc::new(scripted().with_failing_predictions());
    let (_, session) = session(Some("tok"));
    let grouper = PredictionGrouper::new(gateway.clone(), session);

    assert!(grouper
        .try_fetch_grouped(TimeInForce::Live, None)
        .await
        .is_err());
    let grouped = grouper.fetch_grouped(TimeInForce::Live, None).await;

    assert!(grouped.is_empty());
    assert_eq!(gateway.calls("get_event"), 0);
}

#[tokio::test]
async fn event_filter_narrows_predictions() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(Some("tok"));
    let grouper = PredictionGrouper::new(gateway.clone(), session);

    let grouped = grouper
        .fetch_grouped(TimeInForce::Upcoming, Some(&EventId::new("e2")))
        .await;

    assert_eq!(grouped.prediction_count(), 1);
    assert_eq!(gateway.calls("get_event"), 1);
    assert_eq!(
        gateway.recorded().prediction_filters,
        vec![TimeInForce::Upcoming]
    );
}
