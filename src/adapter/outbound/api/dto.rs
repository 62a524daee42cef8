//! Wire types for the REST backend.
//!
//! Response fields arrive in inconsistent shapes (numbers as strings, ids
//! as numbers, optional nesting), so most response fields are kept as raw
//! [`Value`] and normalized when converting into domain types. Nothing in
//! here fails on an odd shape; it degrades to a default instead.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::format::{clamp_percent, decimal_from_value};
use crate::domain::{
    ClanDetail, ClanMember, ClanSummary, Event, FaqEntry, MarketDataDetail, Prediction, Question,
    QuestionActivity, Reward, RewardCategory, SportEvent, UserProfile,
};
use crate::port::{CreateOrder, ExitOrder, PREDICTION_PAGE_SIZE};

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Non-blank text from a string or number field.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-blank text among several fields.
fn first_text<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<String> {
    values.into_iter().find_map(text)
}

fn decimal(value: &Value) -> Option<Decimal> {
    decimal_from_value(value)
}

fn array(value: &Value) -> Vec<Value> {
    value.as_array().cloned().unwrap_or_default()
}

/// Deserialize each array element on its own, dropping the ones that do
/// not fit.
pub(crate) fn items<T: serde::de::DeserializeOwned>(value: &Value) -> Vec<T> {
    array(value)
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Unix seconds from a number or numeric string.
fn unix_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

/// Body of `/prediction/v1/get`. The date filters are always zero.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionsRequest {
    pub day: u32,
    pub month: u32,
    pub year: u32,
    pub page_request: PageRequest,
    pub time_in_force: String,
}

impl PredictionsRequest {
    #[must_use]
    pub fn first_page(time_in_force: String) -> Self {
        Self {
            day: 0,
            month: 0,
            year: 0,
            page_request: PageRequest {
                page_number: 1,
                page_size: PREDICTION_PAGE_SIZE,
            },
            time_in_force,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifiers {
    pub credit_discount: String,
    pub credit_markup: String,
    pub percentage: String,
    pub updated_percentage: String,
}

impl Modifiers {
    fn with_percentage(percentage: Decimal) -> Self {
        Self {
            credit_discount: "0".into(),
            credit_markup: "0".into(),
            percentage: percentage.normalize().to_string(),
            updated_percentage: "0".into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDetails {
    pub selected_prediction_outcome: String,
    pub selected_prediction_choice: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub event_id: String,
    pub question_id: String,
    pub amount: String,
    pub prediction_details: PredictionDetails,
    pub modifiers: Modifiers,
}

impl From<&CreateOrder> for CreateOrderRequest {
    fn from(order: &CreateOrder) -> Self {
        Self {
            event_id: order.event_id.to_string(),
            question_id: order.question_id.to_string(),
            amount: order.amount.normalize().to_string(),
            prediction_details: PredictionDetails {
                selected_prediction_outcome: order.outcome.clone(),
                selected_prediction_choice: true,
            },
            modifiers: Modifiers::with_percentage(order.percentage),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitOrderRequest {
    pub event_id: String,
    pub question_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub amount: String,
    pub modifiers: Modifiers,
}

impl From<&ExitOrder> for ExitOrderRequest {
    fn from(order: &ExitOrder) -> Self {
        Self {
            event_id: order.event_id.to_string(),
            question_id: order.question_id.to_string(),
            order_id: order.order_id.as_ref().map(ToString::to_string),
            amount: order.amount.normalize().to_string(),
            modifiers: Modifiers::with_percentage(order.percentage),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest<'a> {
    pub group_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<&'a str>,
    pub invites: &'a [crate::domain::Invite],
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SelectedOutcomeDto {
    #[serde(rename = "selectedPredictionOutcome")]
    pub selected_prediction_outcome: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionDto {
    pub prediction_id: Value,
    pub id: Value,
    pub question_id: Value,
    pub event_id: Value,
    pub question: Value,
    pub question_name: Value,
    pub event_name: Value,
    pub event_short_name: Value,
    pub event_description: Value,
    pub event_start_date: Value,
    pub predicted_outcome: Value,
    pub prediction_details: SelectedOutcomeDto,
    pub selected_prediction_outcome: Value,
    pub prediction_status: Value,
    pub investment_amt: Value,
    pub matched_amt: Value,
    pub percentage: Value,
    pub exit_percentage: Value,
    pub potential_returns: Value,
    pub earnings: Value,
    pub order_id: Value,
}

impl From<PredictionDto> for Prediction {
    fn from(dto: PredictionDto) -> Self {
        let selected = first_text([
            &dto.prediction_details.selected_prediction_outcome,
            &dto.selected_prediction_outcome,
        ]);
        let question = first_text([
            &dto.question,
            &dto.question_name,
            dto.question.get("description").unwrap_or(&Value::Null),
            dto.question.get("name").unwrap_or(&Value::Null),
        ]);
        let event_start_date = match &dto.event_start_date {
            Value::Number(_) => unix_seconds(&dto.event_start_date)
                .and_then(|s| Utc.timestamp_opt(s, 0).single())
                .map(|at| at.to_rfc3339()),
            other => text(other),
        };

        Self {
            prediction_id: first_text([&dto.prediction_id, &dto.id])
                .unwrap_or_default()
                .into(),
            question_id: text(&dto.question_id).unwrap_or_default().into(),
            event_id: text(&dto.event_id).unwrap_or_default().into(),
            question,
            event_name: text(&dto.event_name),
            event_short_name: text(&dto.event_short_name),
            event_description: text(&dto.event_description),
            event_start_date,
            predicted_outcome: text(&dto.predicted_outcome).or(selected),
            prediction_status: text(&dto.prediction_status).unwrap_or_default(),
            investment_amt: decimal(&dto.investment_amt),
            matched_amt: decimal(&dto.matched_amt),
            percentage: decimal(&dto.percentage),
            exit_percentage: decimal(&dto.exit_percentage),
            potential_returns: decimal(&dto.potential_returns),
            earnings: decimal(&dto.earnings),
            order_id: text(&dto.order_id).map(Into::into),
        }
    }
}

// ---------------------------------------------------------------------------
// Events and questions
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SportEventDto {
    pub name: Value,
    pub event_name: Value,
    pub sport_type: Value,
    pub event_format: Value,
    pub teams: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDto {
    pub id: Value,
    pub event_id: Value,
    pub name: Value,
    pub event_name: Value,
    pub description: Value,
    pub start_date: Value,
    pub status: Value,
    pub teams: Value,
    pub stats: Value,
    pub sport_event: Option<SportEventDto>,
}

impl From<EventDto> for Event {
    fn from(dto: EventDto) -> Self {
        // Stats usually arrive JSON-encoded; an inline object is re-encoded.
        let stats = match dto.stats {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        };
        Self {
            id: first_text([&dto.id, &dto.event_id]).unwrap_or_default().into(),
            name: text(&dto.name),
            event_name: text(&dto.event_name),
            description: text(&dto.description),
            start_date: unix_seconds(&dto.start_date),
            status: text(&dto.status),
            teams: array(&dto.teams),
            stats,
            sport_event: dto.sport_event.map(|s| SportEvent {
                name: text(&s.name),
                event_name: text(&s.event_name),
                sport_type: text(&s.sport_type),
                event_format: text(&s.event_format),
                teams: array(&s.teams),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketDataDto {
    pub outcome: Value,
    pub implied_probability: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityDto {
    pub question_volume: Value,
    pub question_users: Value,
    pub question_probability: Value,
    pub market_data_details: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionDto {
    pub question_id: Value,
    pub id: Value,
    pub name: Value,
    pub question_name: Value,
    pub description: Value,
    pub activity: Option<ActivityDto>,
}

impl From<QuestionDto> for Question {
    fn from(dto: QuestionDto) -> Self {
        let activity = dto.activity.map(|a| QuestionActivity {
            question_volume: decimal(&a.question_volume),
            question_users: decimal(&a.question_users)
                .and_then(|d| u64::try_from(d.trunc().mantissa()).ok()),
            question_probability: text(&a.question_probability),
            market_data_details: items::<MarketDataDto>(&a.market_data_details)
                .into_iter()
                .map(|m| MarketDataDetail {
                    outcome: text(&m.outcome).unwrap_or_default(),
                    implied_probability: decimal(&m.implied_probability).map(clamp_percent),
                })
                .collect(),
        });
        Self {
            question_id: first_text([&dto.question_id, &dto.id])
                .unwrap_or_default()
                .into(),
            name: first_text([&dto.name, &dto.question_name]).unwrap_or_default(),
            description: text(&dto.description),
            activity,
        }
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResponse {
    pub token: Value,
    pub access_token: Value,
    #[serde(rename = "access_token")]
    pub access_token_snake: Value,
    pub refresh_token: Value,
    pub token_expiry: Value,
    pub user_profile: Option<UserProfile>,
}

impl LoginResponse {
    /// The bearer token under whichever name the backend used.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        first_text([&self.token, &self.access_token, &self.access_token_snake])
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiplierInfoDto {
    pub base_amt: Value,
    pub multiplier: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardDto {
    pub category_type: Value,
    pub last_rewarded_at: Value,
    pub multiplier_info: MultiplierInfoDto,
}

impl From<RewardDto> for Reward {
    fn from(dto: RewardDto) -> Self {
        // lastRewardedAt is epoch milliseconds, sometimes as a string.
        let last_rewarded_at = unix_seconds(&dto.last_rewarded_at)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|at| at.to_rfc3339())
            .or_else(|| text(&dto.last_rewarded_at));
        Self {
            category: RewardCategory::from_wire(&text(&dto.category_type).unwrap_or_default()),
            last_rewarded_at,
            base_amt: decimal(&dto.multiplier_info.base_amt).unwrap_or_default(),
            multiplier: decimal(&dto.multiplier_info.multiplier).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FaqDto {
    pub id: Value,
    pub question: Value,
    pub answer: Value,
}

impl From<FaqDto> for FaqEntry {
    fn from(dto: FaqDto) -> Self {
        Self {
            id: dto.id.as_i64().or_else(|| text(&dto.id)?.parse().ok()).unwrap_or_default(),
            question: text(&dto.question).unwrap_or_default(),
            answer: text(&dto.answer).unwrap_or_default(),
        }
    }
}

/// Available balance from `availableBalance`, `available` or
/// `balance.available`, first numeric wins.
#[must_use]
pub fn available_balance(body: &Value) -> Decimal {
    [
        body.get("availableBalance"),
        body.get("available"),
        body.pointer("/balance/available"),
    ]
    .into_iter()
    .flatten()
    .find_map(decimal)
    .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Clans
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupInfoDto {
    pub group_id: Value,
    pub group_name: Value,
    pub group_alias: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserGroupDto {
    pub group_info: GroupInfoDto,
    pub top_first_name: Value,
    pub top_last_name: Value,
    pub top_total_earnings: Value,
    pub group_last_activity: Value,
}

impl From<UserGroupDto> for ClanSummary {
    fn from(dto: UserGroupDto) -> Self {
        Self {
            group_id: text(&dto.group_info.group_id).map(Into::into),
            name: text(&dto.group_info.group_name).unwrap_or_default(),
            alias: text(&dto.group_info.group_alias),
            top_first_name: text(&dto.top_first_name),
            top_last_name: text(&dto.top_last_name),
            top_total_earnings: decimal(&dto.top_total_earnings).unwrap_or_default(),
            last_activity: text(&dto.group_last_activity),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberDto {
    pub user_id: Value,
    pub first_name: Value,
    pub last_name: Value,
    pub user_name: Value,
    pub email: Value,
    pub total_earnings: Value,
}

impl From<MemberDto> for ClanMember {
    fn from(dto: MemberDto) -> Self {
        let full = [text(&dto.first_name), text(&dto.last_name)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let email = text(&dto.email);
        let name = Some(full)
            .filter(|n| !n.is_empty())
            .or_else(|| text(&dto.user_name))
            .or_else(|| email.clone())
            .unwrap_or_default();
        Self {
            user_id: text(&dto.user_id),
            name,
            email,
            total_earnings: decimal(&dto.total_earnings).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupDetailDto {
    #[serde(flatten)]
    pub summary: UserGroupDto,
    pub members: Value,
    pub pending_invites: Value,
}

impl From<GroupDetailDto> for ClanDetail {
    fn from(dto: GroupDetailDto) -> Self {
        let pending_invites = array(&dto.pending_invites)
            .iter()
            .filter_map(|invite| text(invite).or_else(|| text(invite.get("inviteeEmail")?)))
            .collect();
        Self {
            summary: dto.summary.into(),
            members: items::<MemberDto>(&dto.members)
                .into_iter()
                .map(Into::into)
                .collect(),
            pending_invites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn prediction_tolerates_mixed_shapes() {
        let dto: PredictionDto = serde_json::from_value(json!({
            "predictionId": 42,
            "questionId": "q1",
            "eventId": "e1",
            "predictionStatus": "PREDICTION_STATUS_MATCHED",
            "investmentAmt": "100",
            "matchedAmt": 25.5,
            "percentage": "60",
            "predictionDetails": {"selectedPredictionOutcome": "Yes"},
            "orderId": "",
            "eventStartDate": 1_741_608_000
        }))
        .unwrap();
        let p = Prediction::from(dto);
        assert_eq!(p.prediction_id.as_str(), "42");
        assert_eq!(p.investment_amt, Some(dec!(100)));
        assert_eq!(p.matched_amt, Some(dec!(25.5)));
        assert_eq!(p.predicted_outcome.as_deref(), Some("Yes"));
        assert_eq!(p.order_id, None);
        assert_eq!(p.event_start_date.as_deref(), Some("2025-03-10T12:00:00+00:00"));
    }

    #[test]
    fn event_reencodes_inline_stats() {
        let dto: EventDto = serde_json::from_value(json!({
            "eventId": "e9",
            "startDate": "1741608000",
            "stats": {"result_prediction": [{"value": "60"}, {"value": "40"}]},
            "sportEvent": {"sportType": "SPORT_TYPE_CRICKET", "eventFormat": "T20", "teams": [{"name": "A"}]}
        }))
        .unwrap();
        let event = Event::from(dto);
        assert_eq!(event.id.as_str(), "e9");
        assert_eq!(event.start_date, Some(1_741_608_000));
        assert!(event.stats.as_deref().unwrap().contains("result_prediction"));
        assert_eq!(event.teams().len(), 1);
    }

    #[test]
    fn question_activity_parses_strings() {
        let dto: QuestionDto = serde_json::from_value(json!({
            "id": "q7",
            "name": "Who wins?",
            "activity": {
                "questionVolume": "1500.4",
                "questionUsers": "12",
                "marketDataDetails": [
                    {"outcome": "A", "impliedProbability": "140"},
                    {"outcome": "B", "impliedProbability": "abc"},
                    "garbage"
                ]
            }
        }))
        .unwrap();
        let q = Question::from(dto);
        assert_eq!(q.question_id.as_str(), "q7");
        let activity = q.activity.unwrap();
        assert_eq!(activity.question_users, Some(12));
        assert_eq!(activity.market_data_details.len(), 2);
        assert_eq!(activity.market_data_details[0].implied_probability, Some(dec!(100)));
        assert_eq!(activity.market_data_details[1].implied_probability, None);
    }

    #[test]
    fn balance_candidates_in_order() {
        assert_eq!(available_balance(&json!({"availableBalance": "12.5"})), dec!(12.5));
        assert_eq!(available_balance(&json!({"available": "x", "balance": {"available": 3}})), dec!(3));
        assert_eq!(available_balance(&json!({})), dec!(0));
    }

    #[test]
    fn login_token_aliases() {
        let login: LoginResponse = serde_json::from_value(json!({"access_token": "abc"})).unwrap();
        assert_eq!(login.bearer().as_deref(), Some("abc"));
        let login: LoginResponse = serde_json::from_value(json!({"accessToken": "def", "token": ""})).unwrap();
        assert_eq!(login.bearer().as_deref(), Some("def"));
    }

    #[test]
    fn request_bodies_use_strings() {
        let body = serde_json::to_value(CreateOrderRequest::from(&CreateOrder {
            event_id: "e".into(),
            question_id: "q".into(),
            outcome: "Yes".into(),
            amount: dec!(10.00),
            percentage: dec!(62.5),
        }))
        .unwrap();
        assert_eq!(body["amount"], "10");
        assert_eq!(body["modifiers"]["percentage"], "62.5");
        assert_eq!(body["predictionDetails"]["selectedPredictionChoice"], true);
    }
}
