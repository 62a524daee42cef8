#![allow(dead_code)]

use std::sync::Arc;

use juspredict::application::SessionStore;
use juspredict::infrastructure::bootstrap::App;
use juspredict::infrastructure::config::Config;
use juspredict::testkit::config::fast_polling;
use juspredict::testkit::gateway::ScriptedGateway;

/// Wire an app whose every port is served by `gateway`.
pub fn app(gateway: &Arc<ScriptedGateway>, session: &Arc<SessionStore>) -> App {
    let mut config = Config::default();
    config.polling = fast_polling();
    App::with_gateways(
        config,
        Arc::clone(session),
        gateway.clone(),
        gateway.clone(),
        gateway.clone(),
    )
}
