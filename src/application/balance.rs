//! Wallet balance lookup outside an order panel.

use std::sync::Arc;

use tracing::debug;

use crate::application::session::SessionStore;
use crate::domain::Balance;
use crate::error::{Result, ValidationError};
use crate::port::TradingGateway;

pub struct BalanceService {
    gateway: Arc<dyn TradingGateway>,
    session: Arc<SessionStore>,
}

impl BalanceService {
    pub fn new(gateway: Arc<dyn TradingGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    /// Available balance. Rejected locally when logged out.
    pub async fn available(&self) -> Result<Balance> {
        if !self.session.is_logged_in() {
            return Err(ValidationError::NotLoggedIn.into());
        }
        let balance = self.gateway.balance().await?;
        debug!(available = %balance.available_balance, "Fetched balance");
        Ok(balance)
    }
}
