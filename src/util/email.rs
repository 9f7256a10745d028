use std::time::Duration;

use chrono::FixedOffset;
use html_escape::encode_text;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::{
    authentication::Credentials,
    client::{Tls, TlsParameters},
};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info, instrument};

use crate::config::email_conf::SmtpSecurity;
use crate::config::{ConfigError, EmailConfig};
use crate::util::notice::{rupees, OrderNotice, ServiceRequestNotice};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("SMTP error: {0}")]
    SmtpError(String),
    #[error("Message building error: {0}")]
    MessageError(String),
    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

/// One outgoing mail. Every Homly mail has an HTML body; a text body turns it
/// into `multipart/alternative`.
#[derive(Debug, Clone)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
}

pub fn build_mail(from: &Mailbox, mail: Mail) -> Result<Message, EmailError> {
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|e| EmailError::AddressError(format!("Invalid recipient {}: {}", mail.to, e)))?;
    let html = SinglePart::builder().header(ContentType::TEXT_HTML).body(mail.html);
    let builder = Message::builder().from(from.clone()).to(to).subject(mail.subject);

    let built = match mail.text {
        Some(text) => builder.multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::builder().header(ContentType::TEXT_PLAIN).body(text))
                .singlepart(html),
        ),
        None => builder.singlepart(html),
    };
    built.map_err(|e| EmailError::MessageError(e.to_string()))
}

/// Outgoing mail over SMTP (Brevo in production)
pub struct SmtpEmailService {
    pub config: EmailConfig,
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        info!("Initializing SMTP email service");
        config.validate().map_err(EmailError::from)?;

        let sender: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid sender: {}", e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.connection_timeout_secs)))
            .credentials(Credentials::new(config.smtp_username.clone(), config.smtp_password.clone()));

        builder = match config.security() {
            SmtpSecurity::Plain => builder.tls(Tls::None),
            security => {
                let params = TlsParameters::new(config.smtp_host.clone())
                    .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;
                if security == SmtpSecurity::StartTls {
                    builder.tls(Tls::Required(params))
                } else {
                    builder.tls(Tls::Wrapper(params))
                }
            }
        };

        info!("SMTP email service initialized for {}", config.get_smtp_url());
        Ok(Self { config, sender, transport: builder.build() })
    }

    #[instrument(skip(self, mail), fields(to = %mail.to, subject = %mail.subject))]
    pub async fn send(&self, mail: Mail) -> Result<(), EmailError> {
        let message = build_mail(&self.sender, mail)?;
        self.transport.send(message).await.map_err(|e| {
            error!("SMTP delivery failed: {}", e);
            EmailError::SmtpError(e.to_string())
        })?;
        debug!("Email accepted by SMTP relay");
        Ok(())
    }

    #[instrument(skip(self, reset_url), fields(to = %to))]
    pub async fn send_password_reset_email(&self, to: &str, reset_url: &str) -> Result<(), EmailError> {
        self.send(Mail {
            to: to.to_string(),
            subject: "Password Reset Request".to_string(),
            html: password_reset_html(reset_url),
            text: Some(password_reset_text(reset_url)),
        })
        .await?;
        info!("Password reset email sent to {}", to);
        Ok(())
    }

    /// Tell the shop owner about a new order
    #[instrument(skip(self, notice, offset), fields(order = %notice.order.short_ref()))]
    pub async fn send_order_notification(&self, notice: &OrderNotice, offset: FixedOffset) -> Result<(), EmailError> {
        self.send(Mail {
            to: self.notification_recipient()?,
            subject: order_subject(notice),
            html: order_notification_html(notice, offset),
            text: Some(order_notification_text(notice, offset)),
        })
        .await?;
        info!("Order notification email sent");
        Ok(())
    }

    /// Tell the shop owner about a new service request
    #[instrument(skip(self, notice), fields(request = %notice.short_ref()))]
    pub async fn send_service_request_notification(&self, notice: &ServiceRequestNotice) -> Result<(), EmailError> {
        self.send(Mail {
            to: self.notification_recipient()?,
            subject: format!("New Service Request: {}", notice.service_name()),
            html: service_request_html(notice),
            text: None,
        })
        .await?;
        info!("Service request notification email sent");
        Ok(())
    }

    fn notification_recipient(&self) -> Result<String, EmailError> {
        self.config
            .notify_to
            .clone()
            .ok_or_else(|| EmailError::ConfigError("ADMIN_EMAIL is not configured".to_string()))
    }
}

/// Subject line of the order notification
pub fn order_subject(notice: &OrderNotice) -> String {
    format!("New Order #{}", notice.order.short_ref())
}

pub fn password_reset_text(reset_url: &str) -> String {
    format!(
        r#"You requested to reset your Homly password.

Open the following link to choose a new one:

{reset_url}

This link expires in 10 minutes. If you did not request a reset, ignore this email and your password stays unchanged."#,
        reset_url = reset_url
    )
}

pub fn password_reset_html(reset_url: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #2563eb;">Password Reset Request</h2>
    <p>You requested to reset your password. Click the button below to reset it:</p>
    <a href="{reset_url}" style="display: inline-block; padding: 12px 24px; background-color: #2563eb; color: white; text-decoration: none; border-radius: 8px; margin: 20px 0;">Reset Password</a>
    <p>If you didn't request this, please ignore this email.</p>
    <p style="color: #666; font-size: 12px;">This link will expire in 10 minutes.</p>
</div>"#,
        reset_url = encode_text(reset_url)
    )
}

pub fn order_notification_text(notice: &OrderNotice, offset: FixedOffset) -> String {
    let order = &notice.order;
    let mut lines = vec![
        format!("New order #{}", order.short_ref()),
        format!("Customer: {}", notice.customer_name()),
        format!("Mobile: {}", notice.phone()),
        format!("Address: {}", order.shipping_address.one_line()),
        format!("Scheduled delivery: {}", notice.scheduled_label(offset)),
        String::new(),
    ];
    for item in &order.items {
        lines.push(format!(
            "- {} x{} ({}) {}",
            item.name,
            item.quantity,
            notice.store_name(item.store_id.as_ref()),
            rupees(item.price * item.quantity as f64)
        ));
    }
    lines.push(String::new());
    lines.push(format!("Subtotal: {}", rupees(order.subtotal)));
    lines.push(format!("Delivery Charge: {}", notice.delivery_label()));
    if order.discount > 0.0 {
        lines.push(format!("Discount: -{}", rupees(order.discount)));
    }
    lines.push(format!("Total: {}", rupees(order.total)));
    lines.push(format!("Payment: {}", order.payment_method.method_type));
    lines.join("\n")
}

pub fn order_notification_html(notice: &OrderNotice, offset: FixedOffset) -> String {
    let order = &notice.order;
    let address = &order.shipping_address;
    let email = notice.customer.as_ref().map(|c| c.email.as_str()).unwrap_or("Guest checkout");

    let rows: String = order
        .items
        .iter()
        .map(|item| {
            format!(
                r#"<tr><td style="padding: 10px; border-bottom: 1px solid #e5e7eb;"><strong>{name}</strong><br><small style="color: #6b7280;">Store: {store}</small></td><td style="padding: 10px; text-align: center; border-bottom: 1px solid #e5e7eb;">{qty}</td><td style="padding: 10px; text-align: right; border-bottom: 1px solid #e5e7eb;">{amount}</td></tr>"#,
                name = encode_text(&item.name),
                store = encode_text(&notice.store_name(item.store_id.as_ref())),
                qty = item.quantity,
                amount = rupees(item.price * item.quantity as f64),
            )
        })
        .collect();

    let discount_row = if order.discount > 0.0 {
        format!(
            r#"<tr><td><strong>Discount:</strong></td><td style="text-align: right; color: #10b981;">-{}</td></tr>"#,
            rupees(order.discount)
        )
    } else {
        String::new()
    };

    let whatsapp = match notice.whatsapp_link() {
        Some(link) => format!(
            r#"<a href="{}" style="display: inline-block; padding: 12px 24px; background-color: #25D366; color: white; text-decoration: none; border-radius: 8px; font-weight: bold; margin-bottom: 20px;">Contact via WhatsApp</a><br/>"#,
            encode_text(&link)
        ),
        None => String::new(),
    };

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="color: #2563eb;">New Order Received!</h2>
    <div style="background-color: #f3f4f6; padding: 15px; border-radius: 8px; margin-bottom: 20px;">
        <p><strong>Order ID:</strong> #{short_ref}</p>
        <p><strong>Status:</strong> {status}</p>
    </div>
    <div style="background-color: #eff6ff; padding: 15px; border-radius: 8px; margin-bottom: 20px;">
        <h3 style="margin-top: 0;">Customer Details</h3>
        <p><strong>Name:</strong> {name}</p>
        <p><strong>Email:</strong> {email}</p>
        <p><strong>Mobile:</strong> {mobile}</p>
        <p><strong>Address:</strong> {street}</p>
        <p><strong>City:</strong> {city}</p>
        <p><strong>ZIP Code:</strong> {zip}</p>
    </div>
    <h3>Order Items</h3>
    <table style="width: 100%; border-collapse: collapse; margin-bottom: 20px;">
        <thead><tr><th style="text-align: left;">Item</th><th>Qty</th><th style="text-align: right;">Price</th></tr></thead>
        <tbody>{rows}</tbody>
    </table>
    <table style="width: 100%; margin-bottom: 20px;">
        <tr><td><strong>Subtotal:</strong></td><td style="text-align: right;">{subtotal}</td></tr>
        <tr><td><strong>Delivery Charge:</strong></td><td style="text-align: right;">{delivery}</td></tr>
        {discount_row}
        <tr><td><strong>Total:</strong></td><td style="text-align: right;"><strong>{total}</strong></td></tr>
    </table>
    <div style="background-color: #fef3c7; padding: 15px; border-radius: 8px; margin-bottom: 20px;">
        <p><strong>Payment Method:</strong> {payment}</p>
        <p><strong>Delivery Time:</strong> {scheduled}</p>
    </div>
    <div style="text-align: center; margin-top: 30px;">
        {whatsapp}
        <a href="{maps}" style="display: inline-block; padding: 12px 24px; background-color: #4285F4; color: white; text-decoration: none; border-radius: 8px; font-weight: bold;">View on Google Maps</a>
    </div>
</div>"#,
        short_ref = order.short_ref(),
        status = order.status.as_str(),
        name = encode_text(&notice.customer_name()),
        email = encode_text(email),
        mobile = encode_text(&notice.phone()),
        street = encode_text(&address.street),
        city = encode_text(&address.city),
        zip = encode_text(&address.zip),
        rows = rows,
        subtotal = rupees(order.subtotal),
        delivery = notice.delivery_label(),
        discount_row = discount_row,
        total = rupees(order.total),
        payment = encode_text(&order.payment_method.method_type),
        scheduled = notice.scheduled_label(offset),
        whatsapp = whatsapp,
        maps = encode_text(&notice.maps_link()),
    )
}

pub fn service_request_html(notice: &ServiceRequestNotice) -> String {
    let (description, address, service_mobile) = match notice.service {
        Some(ref s) => (s.description.as_str(), s.address.as_str(), s.mobile.as_str()),
        None => ("", "N/A", "N/A"),
    };
    let (name, email, mobile) = match notice.customer {
        Some(ref c) => (c.name.as_str(), c.email.as_str(), c.mobile.as_deref().unwrap_or("N/A")),
        None => ("Customer", "N/A", "N/A"),
    };
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #2563eb;">New Service Request!</h2>
    <div style="background-color: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <h3 style="margin-top: 0;">Service Details</h3>
        <p><strong>Service:</strong> {service}</p>
        <p><strong>Description:</strong> {description}</p>
        <p><strong>Service Address:</strong> {address}</p>
        <p><strong>Service Mobile:</strong> {service_mobile}</p>
    </div>
    <div style="background-color: #eff6ff; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <h3 style="margin-top: 0;">Customer Details</h3>
        <p><strong>Name:</strong> {name}</p>
        <p><strong>Email:</strong> {email}</p>
        <p><strong>Mobile:</strong> {mobile}</p>
    </div>
    <div style="background-color: #fef3c7; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <p><strong>Request ID:</strong> #{short_ref}</p>
        <p><strong>Status:</strong> {status}</p>
        <p><strong>Requested:</strong> {requested}</p>
    </div>
</div>"#,
        service = encode_text(&notice.service_name()),
        description = encode_text(description),
        address = encode_text(address),
        service_mobile = encode_text(service_mobile),
        name = encode_text(name),
        email = encode_text(email),
        mobile = encode_text(mobile),
        short_ref = notice.short_ref(),
        status = notice.request.status.as_str(),
        requested = encode_text(&notice.request.request_date),
    )
}
