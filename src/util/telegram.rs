use std::time::Duration;

use chrono::FixedOffset;
use html_escape::encode_text;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::TelegramConfig;
use crate::util::notice::{rupees, OrderNotice, ServiceRequestNotice};

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),
    #[error("Telegram request failed: {0}")]
    RequestFailed(String),
    #[error("Telegram API returned {status}: {body}")]
    ApiError { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Bot API client posting HTML messages to one chat
pub struct TelegramService {
    pub config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramService {
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TelegramError::ClientError(e.to_string()))?;
        info!("Telegram notifications enabled for chat {}", config.chat_id);
        Ok(TelegramService { config, client })
    }

    #[instrument(skip(self, text))]
    pub async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let body = SendMessage { chat_id: &self.config.chat_id, text, parse_mode: "HTML" };
        let response = self
            .client
            .post(self.config.send_message_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Telegram request failed: {}", e);
                TelegramError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Telegram API error {}: {}", status, body);
            return Err(TelegramError::ApiError { status: status.as_u16(), body });
        }
        info!("Telegram message delivered");
        Ok(())
    }

    pub async fn send_order_notification(&self, notice: &OrderNotice, offset: FixedOffset) -> Result<(), TelegramError> {
        self.send_message(&order_message(notice, offset)).await
    }

    pub async fn send_service_request_notification(&self, notice: &ServiceRequestNotice) -> Result<(), TelegramError> {
        self.send_message(&service_request_message(notice)).await
    }
}

pub fn order_message(notice: &OrderNotice, offset: FixedOffset) -> String {
    let order = &notice.order;
    let items = order
        .items
        .iter()
        .map(|item| {
            format!(
                "- {}x {}\n  Store: {}",
                item.quantity,
                encode_text(&item.name),
                encode_text(&notice.store_name(item.store_id.as_ref()))
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "<b>New Order Received!</b>\n\
         ------------------------\n\
         <b>Order ID:</b> #{short_ref}\n\
         <b>Amount:</b> {total}\n\
         <b>Delivery Charge:</b> {delivery}\n\
         <b>Payment:</b> {payment}\n\
         <b>Scheduled Delivery:</b> {scheduled}\n\
         \n\
         <b>Customer:</b>\n\
         {name}\n\
         {phone}\n\
         {address}\n\
         <a href=\"{maps}\">View Location on Map</a>\n\
         \n\
         <b>Items:</b>\n\
         {items}\n\
         ------------------------\n\
         <i>Homly Order Alert</i>",
        short_ref = order.short_ref(),
        total = rupees(order.total),
        delivery = notice.delivery_label(),
        payment = encode_text(&order.payment_method.method_type),
        scheduled = notice.scheduled_label(offset),
        name = encode_text(&notice.customer_name()),
        phone = encode_text(&notice.phone()),
        address = encode_text(&order.shipping_address.one_line()),
        maps = encode_text(&notice.maps_link()),
        items = items,
    )
}

pub fn service_request_message(notice: &ServiceRequestNotice) -> String {
    let (name, email, mobile) = match notice.customer {
        Some(ref c) => (c.name.as_str(), c.email.as_str(), c.mobile.as_deref().unwrap_or("N/A")),
        None => ("Customer", "N/A", "N/A"),
    };
    let location = notice.service.as_ref().map(|s| s.address.as_str()).unwrap_or("N/A");
    format!(
        "<b>New Service Request!</b>\n\
         ------------------------\n\
         <b>Request ID:</b> #{short_ref}\n\
         <b>Service:</b> {service}\n\
         <b>Status:</b> {status}\n\
         \n\
         <b>Customer Details:</b>\n\
         <b>Name:</b> {name}\n\
         {email}\n\
         {mobile}\n\
         \n\
         <b>Service Location:</b>\n\
         {location}\n\
         ------------------------\n\
         <i>Homly Service Request Alert</i>",
        short_ref = notice.short_ref(),
        service = encode_text(&notice.service_name()),
        status = notice.request.status.as_str(),
        name = encode_text(name),
        email = encode_text(email),
        mobile = encode_text(mobile),
        location = encode_text(location),
    )
}
