//! HTTP delivery to the gesture bridge
//!
//! Each committed command is POSTed once to `{endpoint}/gesture` with a
//! bounded timeout. Failures are logged and dropped; the next committed
//! gesture is the natural retry.

use std::time::Duration;

use gmc_common::api::{CommandRequest, StatusResponse, SubmitResponse};
use gmc_common::config::DeliverySettings;
use gmc_common::Command;
use reqwest::Client;
use tracing::{debug, warn};

use crate::dispatcher::CommandSink;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone)]
pub struct HttpDelivery {
    client: Client,
    gesture_url: String,
    status_url: String,
    probe_timeout: Duration,
}

impl HttpDelivery {
    pub fn new(settings: &DeliverySettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;
        let base = settings.endpoint.trim_end_matches('/');

        Ok(Self {
            client,
            gesture_url: format!("{}/gesture", base),
            status_url: format!("{}/status", base),
            probe_timeout: Duration::from_millis(settings.probe_timeout_ms),
        })
    }

    pub fn gesture_url(&self) -> &str {
        &self.gesture_url
    }

    /// POST one command and wait for the bridge's answer.
    pub async fn send(&self, command: &Command) -> Result<SubmitResponse> {
        let response = self
            .client
            .post(&self.gesture_url)
            .json(&CommandRequest::from(command))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<SubmitResponse>().await?)
    }

    /// Check that the bridge is up.
    pub async fn probe(&self) -> Result<StatusResponse> {
        let response = self
            .client
            .get(&self.status_url)
            .timeout(self.probe_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<StatusResponse>().await?)
    }
}

impl CommandSink for HttpDelivery {
    fn deliver(&self, command: &Command) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime, dropping command {}", command.action);
                return;
            }
        };

        let delivery = self.clone();
        let command = command.clone();
        handle.spawn(async move {
            match delivery.send(&command).await {
                Ok(response) => {
                    debug!("Bridge acknowledged {} ({})", response.gesture, response.status)
                }
                Err(e) => warn!("Failed to deliver {}: {}", command.action, e),
            }
        });
    }
}
