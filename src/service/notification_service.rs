use std::sync::Arc;

use async_trait::async_trait;
use chrono::FixedOffset;
use tracing::{error, info, warn};

use crate::util::email::SmtpEmailService;
use crate::util::error::ServiceError;
use crate::util::notice::{OrderNotice, ServiceRequestNotice};
use crate::util::telegram::TelegramService;

/// Outbound messages triggered by user actions.
///
/// `order_placed` and `service_requested` return immediately; delivery happens
/// in the background and failures are only logged.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn order_placed(&self, notice: OrderNotice);
    fn service_requested(&self, notice: ServiceRequestNotice);
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), ServiceError>;
}

/// Fans notifications out to whichever of email and Telegram are configured
pub struct DispatchNotifier {
    email: Option<Arc<SmtpEmailService>>,
    telegram: Option<Arc<TelegramService>>,
    local_offset: FixedOffset,
}

impl DispatchNotifier {
    pub fn new(
        email: Option<Arc<SmtpEmailService>>,
        telegram: Option<Arc<TelegramService>>,
        local_offset: FixedOffset,
    ) -> Self {
        if email.is_none() {
            warn!("Email notifications disabled");
        }
        if telegram.is_none() {
            warn!("Telegram notifications disabled");
        }
        DispatchNotifier { email, telegram, local_offset }
    }
}

#[async_trait]
impl Notifier for DispatchNotifier {
    fn order_placed(&self, notice: OrderNotice) {
        let offset = self.local_offset;
        let notice = Arc::new(notice);

        if let Some(email) = self.email.clone() {
            let notice = Arc::clone(&notice);
            tokio::spawn(async move {
                if let Err(e) = email.send_order_notification(&notice, offset).await {
                    error!("Failed to send order email for #{}: {}", notice.order.short_ref(), e);
                }
            });
        }

        if let Some(telegram) = self.telegram.clone() {
            tokio::spawn(async move {
                if let Err(e) = telegram.send_order_notification(&notice, offset).await {
                    error!("Failed to send order Telegram alert for #{}: {}", notice.order.short_ref(), e);
                }
            });
        }
    }

    fn service_requested(&self, notice: ServiceRequestNotice) {
        let notice = Arc::new(notice);

        if let Some(email) = self.email.clone() {
            let notice = Arc::clone(&notice);
            tokio::spawn(async move {
                if let Err(e) = email.send_service_request_notification(&notice).await {
                    error!("Failed to send service request email #{}: {}", notice.short_ref(), e);
                }
            });
        }

        if let Some(telegram) = self.telegram.clone() {
            tokio::spawn(async move {
                if let Err(e) = telegram.send_service_request_notification(&notice).await {
                    error!("Failed to send service request Telegram alert #{}: {}", notice.short_ref(), e);
                }
            });
        }
    }

    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), ServiceError> {
        let email = self
            .email
            .as_ref()
            .ok_or_else(|| ServiceError::Unavailable("Email is not configured".to_string()))?;
        email
            .send_password_reset_email(to, reset_url)
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        info!("Password reset link sent");
        Ok(())
    }
}
