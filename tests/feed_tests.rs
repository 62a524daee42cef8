//! Polled prediction feeds and their teardown.

mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use juspredict::domain::{CompletedPeriod, EventId, ListView, PredictionStatus, TimeInForce};
use juspredict::infrastructure::bootstrap::App;
use juspredict::infrastructure::config::Config;
use juspredict::testkit::domain::{detail, event, prediction, question, session};
use juspredict::testkit::gateway::ScriptedGateway;
use rust_decimal_macros::dec;

fn scripted() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_detail(detail(
            event("e1", ("Lions", "Tigers"), (60, 40)),
            vec![question("q1", &[("Yes", dec!(55))])],
        ))
        .with_predictions(vec![
            prediction("p1", "q1", "e1", "PREDICTION_STATUS_MATCHED"),
            prediction("p2", "q1", "e1", "PREDICTION_STATUS_ACCEPTED"),
        ])
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn refresh_publishes_rows() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);
    let feed = app.feed(ListView::All, None);
    assert!(feed.state().loading);

    feed.refresh().await;

    let state = feed.state();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(state.updated_at.is_some());

    let rows = feed.rows(Utc::now());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "Lions vs Tigers");
    assert_eq!(rows[0].status, Some(PredictionStatus::Matched));
    assert!(rows[0].can_exit);
    assert!(!rows[1].can_exit);
}

#[tokio::test]
async fn view_selects_the_time_in_force_filter() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);

    app.feed(ListView::Live, None).refresh().await;
    app.feed(ListView::Completed(CompletedPeriod::LastWeek), None)
        .refresh()
        .await;

    assert_eq!(
        gateway.recorded().prediction_filters,
        vec![
            TimeInForce::Live,
            TimeInForce::Completed(CompletedPeriod::LastWeek)
        ]
    );
}

#[tokio::test]
async fn list_failure_surfaces_as_feed_error() {
    let gateway = Arc::new(scripted().with_failing_predictions());
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);
    let feed = app.feed(ListView::Open, None);

    feed.refresh().await;

    let state = feed.state();
    assert!(!state.loading);
    assert!(state.error.is_some());
    assert!(state.is_empty());
}

#[tokio::test(start_paused = true)]
async fn polling_repeats_at_the_configured_interval() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);
    let feed = app.feed(ListView::Live, None);
    let mut rx = feed.subscribe();

    let handle = feed.start(&app.poller(&feed));
    rx.changed().await.unwrap();
    assert_eq!(gateway.calls("list_predictions"), 1);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(gateway.calls("list_predictions"), 3);

    handle.deactivate();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(gateway.calls("list_predictions"), 3);
}

#[tokio::test(start_paused = true)]
async fn result_in_flight_at_teardown_is_discarded() {
    let gateway = Arc::new(scripted());
    let gate = gateway.hold();
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);
    let feed = app.feed(ListView::All, None);

    let handle = feed.start(&app.poller(&feed));
    while gateway.calls("list_predictions") == 0 {
        settle().await;
    }
    handle.deactivate();

    gate.add_permits(1);
    settle().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let state = feed.state();
    assert!(state.loading);
    assert!(state.updated_at.is_none());
    assert!(state.is_empty());
}

#[test]
fn only_the_account_wide_live_feed_polls_fast() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(Some("tok"));
    let app = App::with_gateways(
        Config::default(),
        session,
        gateway.clone(),
        gateway.clone(),
        gateway,
    );
    let interval = |view, event: Option<&str>| {
        let feed = app.feed(view, event.map(EventId::new));
        app.poller(&feed).interval()
    };

    assert_eq!(interval(ListView::Live, None), Duration::from_secs(30));
    assert_eq!(interval(ListView::Live, Some("e1")), Duration::from_secs(120));
    assert_eq!(interval(ListView::Open, None), Duration::from_secs(120));
}
