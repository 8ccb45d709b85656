//! Simulated receipt delivery
//!
//! No mail is actually sent. `SimulatedGateway` waits a fixed latency and
//! then decides the outcome with a weighted coin flip, which is enough to
//! drive the delivery workflow through both of its terminal states.

use crate::core::traits::DeliveryGateway;
use crate::types::{DeliveryError, ReceiptMessage};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::Mutex;

/// Configuration for simulated delivery
#[derive(Clone, Debug, PartialEq)]
pub struct DeliveryConfig {
    /// Time a send takes before its outcome is known
    pub latency: Duration,
    /// Probability in `[0, 1]` that a send is delivered
    pub success_rate: f64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(2),
            success_rate: 0.8,
        }
    }
}

impl DeliveryConfig {
    /// Create a DeliveryConfig, falling back to the default success rate if
    /// the given one is not a probability
    pub fn new(latency: Duration, success_rate: f64) -> Self {
        let default = Self::default();

        let success_rate = if (0.0..=1.0).contains(&success_rate) {
            success_rate
        } else {
            tracing::warn!(
                "Invalid success_rate ({}), using default ({})",
                success_rate,
                default.success_rate
            );
            default.success_rate
        };

        Self {
            latency,
            success_rate,
        }
    }
}

/// Gateway that pretends to send mail
#[derive(Debug)]
pub struct SimulatedGateway {
    config: DeliveryConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedGateway {
    /// Create a gateway with outcomes drawn from OS entropy
    ///
    /// The config's fields are public, so the success rate is checked again
    /// here with the same fallback as [`DeliveryConfig::new`].
    pub fn new(config: DeliveryConfig) -> Self {
        Self {
            config: DeliveryConfig::new(config.latency, config.success_rate),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Create a gateway whose outcomes repeat for the same seed
    pub fn with_seed(config: DeliveryConfig, seed: u64) -> Self {
        Self {
            config: DeliveryConfig::new(config.latency, config.success_rate),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }
}

#[async_trait]
impl DeliveryGateway for SimulatedGateway {
    async fn send(&self, message: &ReceiptMessage) -> Result<(), DeliveryError> {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let delivered = self.rng.lock().await.random_bool(self.config.success_rate);
        tracing::debug!(
            id = %message.transaction_id,
            recipient = %message.recipient,
            delivered,
            "simulated delivery resolved"
        );

        if delivered {
            Ok(())
        } else {
            Err(DeliveryError::Rejected(format!(
                "simulated bounce from {}",
                message.recipient
            )))
        }
    }
}
