use std::{sync::Arc, time::Duration};

use brokerage_core_health_contracts::{HealthFeatureService, HealthStatus};
use brokerage_core_submission_contracts::delivery::DeliveryConfig;
use brokerage_email_contracts::EmailService;
use tokio::{sync::RwLock, time::Instant};
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Email> {
    email: Email,
    config: HealthFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
    pub delivery: Arc<DeliveryConfig>,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: Instant,
}

impl<Email> HealthFeatureServiceImpl<Email> {
    pub fn new(email: Email, config: HealthFeatureConfig) -> Self {
        Self {
            email,
            config,
            state: Default::default(),
        }
    }
}

impl<Email> HealthFeatureService for HealthFeatureServiceImpl<Email>
where
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = Instant::now();
        let fresh = |cached: &&CachedStatus| now < cached.timestamp + self.config.cache_ttl;

        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard.as_ref().filter(fresh) {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard.as_ref().filter(fresh) {
            return cached.status;
        }

        let email = match self.config.delivery.resolve() {
            Ok(delivery) => self
                .email
                .ping(&delivery.smtp)
                .await
                .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
                .is_ok(),
            Err(err) => {
                warn!("Skipping smtp health check: {err}");
                false
            }
        };

        let status = HealthStatus { email };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use brokerage_demo::submission::{DELIVERY_CONFIG, MAIL_DELIVERY};
    use brokerage_email_contracts::{EmailSendError, MockEmailService};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sut(email: MockEmailService, cache_ttl: Duration) -> HealthFeatureServiceImpl<MockEmailService> {
        HealthFeatureServiceImpl::new(
            email,
            HealthFeatureConfig {
                cache_ttl,
                delivery: DELIVERY_CONFIG.clone().into(),
            },
        )
    }

    #[tokio::test]
    async fn healthy() {
        // Arrange
        let email = MockEmailService::new().with_ping(MAIL_DELIVERY.smtp.clone(), Ok(()));
        let sut = sut(email, Duration::from_secs(60));

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: true });
    }

    #[tokio::test]
    async fn smtp_unreachable() {
        // Arrange
        let email = MockEmailService::new().with_ping(
            MAIL_DELIVERY.smtp.clone(),
            Err(EmailSendError::Unreachable(anyhow!("connection refused"))),
        );
        let sut = sut(email, Duration::from_secs(60));

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: false });
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let sut = HealthFeatureServiceImpl::new(
            MockEmailService::new(),
            HealthFeatureConfig {
                cache_ttl: Duration::from_secs(60),
                delivery: DeliveryConfig {
                    smtp_host: None,
                    ..DELIVERY_CONFIG.clone()
                }
                .into(),
            },
        );

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: false });
    }

    #[tokio::test]
    async fn cached() {
        // Arrange
        let email = MockEmailService::new().with_ping(MAIL_DELIVERY.smtp.clone(), Ok(()));
        let sut = sut(email, Duration::from_secs(60));

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn expired() {
        // Arrange
        let mut email = MockEmailService::new();
        email
            .expect_ping()
            .times(2)
            .returning(|_| Box::pin(std::future::ready(Ok(()))));
        let sut = sut(email, Duration::ZERO);

        // Act
        sut.get_status().await;
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: true });
    }
}
