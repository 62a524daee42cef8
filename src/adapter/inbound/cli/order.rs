//! Handlers for `predict`, `cancel` and `exit`.

use serde_json::json;

use crate::adapter::inbound::cli::command::{OrderTargetArgs, PredictArgs};
use crate::adapter::inbound::cli::output;
use crate::application::{OrderAction, OrderPanel, PanelState};
use crate::domain::format::format_currency;
use crate::domain::{EventId, QuestionId};
use crate::error::Result;
use crate::infrastructure::bootstrap::App;

async fn open_panel(
    app: &App,
    event_id: &EventId,
    question_id: Option<&QuestionId>,
) -> Result<OrderPanel> {
    let question = app.catalog().find_question(event_id, question_id).await?;
    let panel = app.order_panel(event_id.clone(), question);
    panel.load().await;
    Ok(panel)
}

/// Execute `predict`.
pub async fn execute_predict(app: &App, args: PredictArgs) -> Result<()> {
    let panel = open_panel(app, &args.event_id, args.question.as_ref()).await?;
    panel.select_outcome(args.outcome);
    panel.set_amount(args.amount);
    panel.set_confidence(args.confidence);

    if let Some(estimate) = panel.state().estimate() {
        output::field("Confidence", format!("{}%", estimate.confidence.normalize()));
        output::field("Profit", output::positive(format_currency(estimate.profit)));
        output::field("Return", format_currency(estimate.total_return));
    }

    run(&panel, OrderAction::Create).await
}

/// Execute `cancel` or `exit` for the user's prediction on a question.
pub async fn execute_target(app: &App, args: OrderTargetArgs, action: OrderAction) -> Result<()> {
    let panel = open_panel(app, &args.event_id, args.question.as_ref()).await?;
    run(&panel, action).await
}

async fn run(panel: &OrderPanel, action: OrderAction) -> Result<()> {
    let pb = output::spinner(&format!("{}...", action.label()));
    if let Err(err) = panel.dispatch(action).await {
        output::spinner_fail(&pb);
        return Err(err);
    }
    let state = panel.state();
    output::spinner_success(&pb, state.notice.as_deref().unwrap_or(action.label()));
    render(&state, action);
    Ok(())
}

fn render(state: &PanelState, action: OrderAction) {
    if output::is_json() {
        output::json_output(json!({
            "command": action,
            "status": "ok",
            "notice": state.notice,
            "prediction": state.prediction,
            "balance": state.balance,
        }));
        return;
    }

    if let Some(prediction) = &state.prediction {
        output::field("Prediction", &prediction.prediction_id);
        output::field("Status", &prediction.prediction_status);
    }
    if let Some(balance) = state.balance {
        output::field("Balance", format_currency(balance.available_balance));
    }
}
