//! End-to-end flows through the wired application.

mod support;

use std::sync::Arc;

use chrono::Utc;
use juspredict::application::event::question_rows;
use juspredict::application::{OrderAction, QuestionTab};
use juspredict::domain::{
    Balance, ClanSummary, EventId, GroupId, ListView, QuestionId, TimeInForce,
};
use juspredict::error::{Error, ValidationError};
use juspredict::port::EventQuery;
use juspredict::testkit::domain::{detail, event, prediction, question, session};
use juspredict::testkit::gateway::ScriptedGateway;
use rust_decimal_macros::dec;

fn scripted() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_events(vec![event("e1", ("Lions", "Tigers"), (60, 40))])
        .with_detail(detail(
            event("e1", ("Lions", "Tigers"), (60, 40)),
            vec![
                question("q1", &[("Yes", dec!(55)), ("No", dec!(45))]),
                question("q2", &[("Lions", dec!(62.25)), ("Tigers", dec!(37.75))]),
                question("q3", &[("Over", dec!(50))]),
            ],
        ))
        .with_balance(Balance::new(dec!(100)))
}

#[tokio::test]
async fn event_card_shows_win_probabilities() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(None);
    let app = support::app(&gateway, &session);

    let cards = app
        .catalog()
        .cards(&EventQuery::default(), Utc::now())
        .await
        .unwrap();

    assert_eq!(cards.len(), 1);
    let card = &cards[0];
    assert_eq!(card.name, "Lions vs Tigers");
    assert_eq!(card.win_probability, (dec!(60), dec!(40)));
    assert_eq!(card.bar_widths(), (dec!(60), dec!(40)));
    assert_eq!(card.team_name(0), "Lions");
    assert_eq!(card.teams[1].tag, "TI");
    assert_eq!(gateway.recorded().event_queries[0], EventQuery::default());
}

#[tokio::test]
async fn question_defaults_to_the_latest_and_marks_the_users_pick() {
    let gateway = Arc::new(scripted().with_predictions(vec![{
        let mut p = prediction("p1", "q3", "e1", "PREDICTION_STATUS_ACCEPTED");
        p.predicted_outcome = Some("Over".into());
        p
    }]));
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);

    let view = app
        .catalog()
        .question(&EventId::new("e1"), None)
        .await
        .unwrap();

    assert_eq!(view.question_id, QuestionId::new("q3"));
    assert_eq!(view.volume, dec!(1000));
    assert_eq!(view.traders, 12);
    assert!(view.outcomes[0].chosen);
    assert!(view.my_prediction.is_some());
}

#[tokio::test]
async fn outcome_probabilities_round_to_one_place() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(None);
    let app = support::app(&gateway, &session);

    let view = app
        .catalog()
        .question(&EventId::new("e1"), Some(&QuestionId::new("q2")))
        .await
        .unwrap();

    assert_eq!(view.outcomes[0].probability, Some(dec!(62.3)));
    assert_eq!(view.outcomes[1].probability, Some(dec!(37.8)));
    assert!(view.my_prediction.is_none());
    assert_eq!(gateway.calls("predictions_by_question"), 0);
}

#[tokio::test]
async fn unknown_question_is_reported() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(None);
    let app = support::app(&gateway, &session);

    let err = app
        .catalog()
        .question(&EventId::new("e1"), Some(&QuestionId::new("nope")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(ValidationError::Invalid(_))));
}

#[tokio::test]
async fn question_tabs_filter_rows_by_prediction_status() {
    let gateway = Arc::new(scripted().with_predictions(vec![
        prediction("p1", "q1", "e1", "PREDICTION_STATUS_MATCHED"),
        prediction("p2", "q2", "e1", "PREDICTION_STATUS_ACCEPTED"),
    ]));
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);
    let event_id = EventId::new("e1");

    let detail = app.catalog().event(&event_id).await.unwrap();
    let grouped = app
        .grouper()
        .fetch_grouped(TimeInForce::Upcoming, Some(&event_id))
        .await;

    let all = question_rows(&detail.questions, &grouped, QuestionTab::default(), None);
    assert_eq!(all.len(), 3);

    let live = question_rows(
        &detail.questions,
        &grouped,
        QuestionTab::View(ListView::Live),
        None,
    );
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].question.question_id, QuestionId::new("q1"));

    let open = question_rows(
        &detail.questions,
        &grouped,
        QuestionTab::View(ListView::Open),
        None,
    );
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].question.question_id, QuestionId::new("q2"));

    let others = question_rows(
        &detail.questions,
        &grouped,
        QuestionTab::Others,
        Some(&QuestionId::new("q1")),
    );
    assert_eq!(others.len(), 2);
    assert!(others
        .iter()
        .all(|row| row.question.question_id != QuestionId::new("q1")));
}

#[tokio::test]
async fn matched_prediction_panel_offers_only_exit() {
    let gateway = Arc::new(scripted().with_predictions(vec![prediction(
        "p1",
        "q1",
        "e1",
        "PREDICTION_STATUS_MATCHED",
    )]));
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);
    let event_id = EventId::new("e1");

    let question = app
        .catalog()
        .find_question(&event_id, Some(&QuestionId::new("q1")))
        .await
        .unwrap();
    let panel = app.order_panel(event_id, question);
    panel.load().await;

    let state = panel.state();
    assert_eq!(state.balance, Some(Balance::new(dec!(100))));
    assert!(state.prediction.is_some());
    assert_eq!(panel.available_action().unwrap(), Some(OrderAction::Exit));

    let view = app
        .catalog()
        .question(&EventId::new("e1"), Some(&QuestionId::new("q1")))
        .await
        .unwrap();
    assert_eq!(view.action, Some(OrderAction::Exit));
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["action"], "exit");
}

#[tokio::test]
async fn question_without_a_prediction_offers_predict() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);

    let view = app
        .catalog()
        .question(&EventId::new("e1"), Some(&QuestionId::new("q2")))
        .await
        .unwrap();

    assert_eq!(view.action, Some(OrderAction::Create));
    assert_eq!(view.action.map(OrderAction::label), Some("Predict"));
}

#[tokio::test]
async fn balance_requires_login() {
    let gateway = Arc::new(scripted());
    let (_, session) = session(None);
    let app = support::app(&gateway, &session);

    assert!(matches!(
        app.balances().available().await,
        Err(Error::Validation(ValidationError::NotLoggedIn))
    ));
    assert_eq!(gateway.calls("balance"), 0);
}

#[tokio::test]
async fn clan_list_filters_and_invites_are_normalized() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .with_clans(vec![
                ClanSummary {
                    name: "Night Owls".into(),
                    alias: Some("owls".into()),
                    ..ClanSummary::default()
                },
                ClanSummary {
                    name: "Early Birds".into(),
                    top_first_name: Some("Robin".into()),
                    ..ClanSummary::default()
                },
            ])
            .with_new_group_id("g1"),
    );
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);
    let clans = app.clans();

    let found = clans.list(Some("robin")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Early Birds");

    let group_id = clans.create("Sunday League", None).await.unwrap();
    assert_eq!(group_id, GroupId::new("g1"));

    let invites = clans
        .invite(&group_id, None, " A@Example.com ;b@example.com,\n")
        .await
        .unwrap();
    let emails: Vec<_> = invites.iter().map(|i| i.invitee_email.as_str()).collect();
    assert_eq!(emails, ["a@example.com", "b@example.com"]);
    assert_eq!(gateway.recorded().invites.len(), 1);

    let cancelled = clans.cancel_invites(&group_id, "b@example.com").await.unwrap();
    assert_eq!(cancelled, vec!["b@example.com".to_string()]);
}

#[test]
fn build_persists_the_session_where_configured() {
    use juspredict::infrastructure::bootstrap::App;
    use juspredict::testkit::config::local;
    use juspredict::testkit::domain::grant;

    let dir = tempfile::tempdir().unwrap();
    let configured = dir.path().join("custom").join("session.json");
    let fallback = dir.path().join("session.json");

    let app = App::build(local(configured.clone()), &fallback);
    assert!(!app.session().is_logged_in());
    app.session().save_login(&grant("tok")).unwrap();

    assert!(configured.exists());
    assert!(!fallback.exists());
}

#[tokio::test]
async fn partial_invite_cancellation_names_what_went_through() {
    let gateway = Arc::new(ScriptedGateway::new().with_failing_cancel("b@example.com"));
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);
    let group_id = GroupId::new("g1");

    let err = app
        .clans()
        .cancel_invites(&group_id, "a@example.com, b@example.com, c@example.com")
        .await
        .unwrap_err();

    match err {
        Error::PartialCancel {
            cancelled, failed, ..
        } => {
            assert_eq!(cancelled, vec!["a@example.com".to_string()]);
            assert_eq!(failed, "b@example.com");
        }
        other => panic!("expected a partial cancellation, got {other}"),
    }
    let attempted: Vec<_> = gateway
        .recorded()
        .cancelled_invites
        .into_iter()
        .map(|(_, email)| email)
        .collect();
    assert_eq!(attempted, ["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn first_invite_cancellation_failure_is_returned_as_is() {
    let gateway = Arc::new(ScriptedGateway::new().with_failing_cancel("a@example.com"));
    let (_, session) = session(Some("tok"));
    let app = support::app(&gateway, &session);

    let err = app
        .clans()
        .cancel_invites(&GroupId::new("g1"), "a@example.com, b@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api(_)));
    assert_eq!(gateway.calls("cancel_invite"), 1);
}
