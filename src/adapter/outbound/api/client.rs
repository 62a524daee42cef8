//! REST client for the prediction backend.
//!
//! Every endpoint is a JSON `POST`. Responses carry a `status.type`
//! envelope; anything other than `SUCCESS` is reported as
//! [`ApiError::Status`]. A missing envelope is accepted.
//!
//! Reads retry on timeouts and connection failures. Order mutations are
//! sent exactly once: the backend takes no idempotency key, so a retried
//! create could place a second order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::dto::{
    self, available_balance, items, CreateOrderRequest, EventDto, ExitOrderRequest, FaqDto,
    GroupDetailDto, InviteRequest, LoginResponse, PredictionDto, PredictionsRequest, QuestionDto,
    RewardDto, UserGroupDto,
};
use crate::application::SessionStore;
use crate::domain::{
    Balance, ClanDetail, ClanSummary, Event, EventDetail, EventId, FaqEntry, GroupId, Invite,
    LoginGrant, NewClan, OrderId, Prediction, PredictionId, QuestionId, Reward, TimeInForce,
    UserInfo,
};
use crate::error::{ApiError, Result};
use crate::infrastructure::config::ApiConfig;
use crate::port::{
    AccountGateway, ClanGateway, CreateOrder, EventGateway, EventQuery, ExitOrder, OrderGateway,
    OrderReceipt, PredictionGateway, QUESTION_PAGE_SIZE,
};

/// Whether an endpoint may be called without a stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Token attached when present.
    Public,
    /// Fails with [`ApiError::MissingToken`] before sending when logged out.
    Authenticated,
}

/// HTTP client for the prediction backend.
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    session: Arc<SessionStore>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into(),
            session,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &ApiConfig, session: Arc<SessionStore>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.clone(),
            session,
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// Send once. Used for every mutation.
    async fn post<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
        access: Access,
    ) -> Result<Value> {
        self.send(endpoint, body, access, 1).await
    }

    /// Send, retrying transient transport failures up to the configured
    /// attempt count. Reads only.
    async fn post_with_retry<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
        access: Access,
    ) -> Result<Value> {
        self.send(endpoint, body, access, self.retry_max_attempts.max(1))
            .await
    }

    async fn send<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
        access: Access,
        max_attempts: u32,
    ) -> Result<Value> {
        let token = self.session.token();
        if access == Access::Authenticated && token.is_none() {
            return Err(ApiError::MissingToken.into());
        }

        let url = self.url(endpoint);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let mut request = self.http.post(&url).json(body);
            if let Some(token) = &token {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(endpoint, attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = response.error_for_status()?;

            let text = match response.text().await {
                Ok(text) => text,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(endpoint, attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };
            check_status(endpoint, &body)?;
            debug!(endpoint, attempt, "Request succeeded");
            return Ok(body);
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, endpoint: &str, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            endpoint,
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

/// Reject a response whose status envelope reports anything but success.
pub(crate) fn check_status(endpoint: &str, body: &Value) -> Result<()> {
    match body.pointer("/status/type").and_then(Value::as_str) {
        None | Some("SUCCESS") => Ok(()),
        Some(status) => {
            warn!(endpoint, status, "Backend rejected request");
            Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.to_string(),
            }
            .into())
        }
    }
}

fn predictions(body: &Value, key: &str) -> Vec<Prediction> {
    items::<PredictionDto>(body.get(key).unwrap_or(&Value::Null))
        .into_iter()
        .map(Prediction::from)
        .collect()
}

#[async_trait]
impl EventGateway for ApiClient {
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
        let mut body = json!({
            "status": query.statuses,
            "category": query.category,
            "pageNumber": query.page_number,
            "pageSize": query.page_size,
        });
        if let Some(hierarchy) = &query.event_hierarchy {
            body["eventHierarchy"] = json!(hierarchy);
        }

        info!(page = query.page_number, "Fetching events");
        let response = self
            .post_with_retry("/event/v1/listevents", &body, Access::Public)
            .await?;

        let events: Vec<Event> = items::<EventDto>(&response["events"])
            .into_iter()
            .map(Event::from)
            .collect();
        debug!(count = events.len(), "Fetched events");
        Ok(events)
    }

    async fn get_event(&self, event_id: &EventId) -> Result<EventDetail> {
        let body = json!({
            "eventId": event_id.as_str(),
            "getEventQuestions": true,
            "questionsPageInfo": { "pageNumber": 1, "pageSize": QUESTION_PAGE_SIZE },
        });
        let response = self
            .post_with_retry("/event/v1/getevent", &body, Access::Public)
            .await?;

        let event = response
            .get("event")
            .filter(|event| event.is_object())
            .cloned()
            .ok_or_else(|| ApiError::MissingField {
                endpoint: "/event/v1/getevent".into(),
                field: "event",
            })?;
        let mut event = Event::from(serde_json::from_value::<EventDto>(event)?);
        if event.id.is_empty() {
            event.id = event_id.clone();
        }
        let questions = items::<QuestionDto>(&response["questions"])
            .into_iter()
            .map(Into::into)
            .collect::<Vec<_>>();

        debug!(event_id = %event_id, questions = questions.len(), "Fetched event");
        Ok(EventDetail { event, questions })
    }
}

#[async_trait]
impl PredictionGateway for ApiClient {
    async fn list_predictions(&self, time_in_force: TimeInForce) -> Result<Vec<Prediction>> {
        let body = PredictionsRequest::first_page(time_in_force.as_wire());
        let response = self
            .post_with_retry("/prediction/v1/get", &body, Access::Authenticated)
            .await?;
        let list = predictions(&response, "predictions");
        debug!(filter = %time_in_force.as_wire(), count = list.len(), "Fetched predictions");
        Ok(list)
    }

    async fn prediction_by_id(&self, prediction_id: &PredictionId) -> Result<Option<Prediction>> {
        let body = json!({ "predictionId": prediction_id.as_str() });
        let response = self
            .post_with_retry("/prediction/v1/getbyid", &body, Access::Authenticated)
            .await?;
        Ok(response
            .get("prediction")
            .filter(|p| p.is_object())
            .cloned()
            .and_then(|p| serde_json::from_value::<PredictionDto>(p).ok())
            .map(Prediction::from))
    }

    async fn predictions_by_question(
        &self,
        question_id: &QuestionId,
        time_in_force: TimeInForce,
    ) -> Result<Vec<Prediction>> {
        let body = json!({
            "questionId": question_id.as_str(),
            "timeInForce": time_in_force.as_wire(),
        });
        let response = self
            .post_with_retry("/prediction/v1/getbyquestion", &body, Access::Authenticated)
            .await?;
        Ok(predictions(&response, "myPredictions"))
    }
}

#[async_trait]
impl OrderGateway for ApiClient {
    async fn create_order(&self, order: &CreateOrder) -> Result<OrderReceipt> {
        info!(
            event_id = %order.event_id,
            question_id = %order.question_id,
            outcome = %order.outcome,
            amount = %order.amount,
            "Creating order"
        );
        let response = self
            .post(
                "/order/v1/createorder",
                &CreateOrderRequest::from(order),
                Access::Authenticated,
            )
            .await?;
        Ok(OrderReceipt {
            order_id: dto::text(&response["orderId"]).map(OrderId::from),
            prediction_id: dto::text(&response["predictionId"]).map(PredictionId::from),
        })
    }

    async fn cancel_order(&self, order_id: &OrderId) -> Result<()> {
        info!(order_id = %order_id, "Cancelling order");
        self.post(
            "/order/v1/cancelorder",
            &json!({ "orderId": order_id.as_str() }),
            Access::Authenticated,
        )
        .await?;
        Ok(())
    }

    async fn exit_order(&self, order: &ExitOrder) -> Result<()> {
        info!(
            question_id = %order.question_id,
            amount = %order.amount,
            "Requesting exit"
        );
        self.post(
            "/order/v1/exitorder",
            &ExitOrderRequest::from(order),
            Access::Authenticated,
        )
        .await?;
        Ok(())
    }

    async fn balance(&self) -> Result<Balance> {
        let response = self
            .post_with_retry("/balances/v1/get", &json!({}), Access::Authenticated)
            .await?;
        Ok(Balance::new(available_balance(&response)))
    }
}

#[async_trait]
impl AccountGateway for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant> {
        let body = json!({ "emailLogin": { "email": email, "password": password } });
        let response = self.post("/user/v1/login", &body, Access::Public).await?;
        let login: LoginResponse = serde_json::from_value(response)?;
        let token = login.bearer().ok_or_else(|| ApiError::MissingField {
            endpoint: "/user/v1/login".into(),
            field: "token",
        })?;
        info!("Login accepted");
        Ok(LoginGrant {
            token,
            refresh_token: dto::text(&login.refresh_token),
            token_expiry: dto::text(&login.token_expiry),
            profile: login.user_profile,
        })
    }

    async fn logout(&self) -> Result<()> {
        self.post("/user/v1/logout", &json!({}), Access::Authenticated)
            .await?;
        Ok(())
    }

    async fn user_info(&self) -> Result<UserInfo> {
        let response = self
            .post_with_retry("/user/v1/getinfo", &json!({}), Access::Authenticated)
            .await?;
        let info = response.get("userInfo").cloned().unwrap_or(response);
        Ok(serde_json::from_value(info)?)
    }

    async fn edit_user_info(&self, info: &UserInfo) -> Result<()> {
        self.post(
            "/user/v1/editinfo",
            &json!({ "userInfo": info }),
            Access::Authenticated,
        )
        .await?;
        Ok(())
    }

    async fn rewards(&self) -> Result<Vec<Reward>> {
        let response = self
            .post_with_retry("/user/v1/getrewards", &json!({}), Access::Authenticated)
            .await?;
        Ok(items::<RewardDto>(&response["rewards"])
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn faq(&self) -> Result<Vec<FaqEntry>> {
        let response = self
            .post_with_retry("/misc/v1/faq", &json!({}), Access::Public)
            .await?;
        Ok(items::<FaqDto>(&response["faqs"])
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

#[async_trait]
impl ClanGateway for ApiClient {
    async fn list_clans(&self) -> Result<Vec<ClanSummary>> {
        let response = self
            .post_with_retry("/group/v1/list", &json!({}), Access::Authenticated)
            .await?;
        let clans: Vec<ClanSummary> = items::<UserGroupDto>(&response["userGroupInfo"])
            .into_iter()
            .map(Into::into)
            .collect();
        debug!(count = clans.len(), "Fetched clans");
        Ok(clans)
    }

    async fn clan_detail(&self, group_id: &GroupId) -> Result<ClanDetail> {
        let response = self
            .post_with_retry(
                "/group/v1/get",
                &json!({ "groupId": group_id.as_str() }),
                Access::Authenticated,
            )
            .await?;
        let mut detail = ClanDetail::from(serde_json::from_value::<GroupDetailDto>(response)?);
        if detail.summary.group_id.is_none() {
            detail.summary.group_id = Some(group_id.clone());
        }
        Ok(detail)
    }

    async fn create_clan(&self, clan: &NewClan) -> Result<GroupId> {
        info!(name = %clan.name, "Creating clan");
        let response = self
            .post(
                "/group/v1/create",
                &json!({ "groupName": clan.name, "groupAlias": clan.alias }),
                Access::Authenticated,
            )
            .await?;
        dto::text(&response["groupId"])
            .map(GroupId::from)
            .ok_or_else(|| {
                ApiError::MissingField {
                    endpoint: "/group/v1/create".into(),
                    field: "groupId",
                }
                .into()
            })
    }

    async fn invite_members(
        &self,
        group_id: &GroupId,
        group_name: Option<&str>,
        invites: &[Invite],
    ) -> Result<()> {
        info!(group_id = %group_id, count = invites.len(), "Sending invites");
        let body = InviteRequest {
            group_id: group_id.as_str(),
            group_name,
            invites,
        };
        self.post("/group/v1/invite", &body, Access::Authenticated)
            .await?;
        Ok(())
    }

    async fn cancel_invite(&self, group_id: &GroupId, email: &str) -> Result<()> {
        self.post(
            "/group/v1/cancelinvite",
            &json!({ "groupId": group_id.as_str(), "emailId": email }),
            Access::Authenticated,
        )
        .await?;
        debug!(group_id = %group_id, email, "Cancelled invite");
        Ok(())
    }
}
