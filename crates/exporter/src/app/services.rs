use std::sync::Arc;

use deconz_client::GatewayClient;

use crate::api::server::ApiServer;
use crate::poller::SensorPoller;

/// Application dependencies, all sharing one metric registry
pub struct ApplicationServices {
    pub poller: Arc<SensorPoller<GatewayClient>>,
    pub api_server: ApiServer,
}
