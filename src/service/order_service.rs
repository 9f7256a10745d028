use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::dto::order_dto::{CreateOrderRequest, OrderItemInput, ShippingAddressInput};
use crate::model::order::{
    plan_delivery_waiver, DeliveryWaiver, Order, OrderItem, OrderScope, OrderStatus, OrderTotals, OrderView,
    PaymentMethod, ShippingAddress,
};
use crate::model::product::Product;
use crate::model::setting::MAINTENANCE_MODE_KEY;
use crate::model::store::StoreRef;
use crate::model::user::{Address, Role, User, UserContact};
use crate::repository::mongo::now_timestamp;
use crate::repository::order_repo::OrderRepository;
use crate::repository::product_repo::ProductRepository;
use crate::repository::settings_repo::SettingsRepository;
use crate::repository::store_repo::StoreRepository;
use crate::repository::user_repo::UserRepository;
use crate::service::notification_service::Notifier;
use crate::util::error::{ServiceError, ServiceResult};
use crate::util::notice::OrderNotice;

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Places an order for `buyer`, or as a guest when `None`
    async fn create_order(&self, buyer: Option<User>, request: CreateOrderRequest) -> ServiceResult<Order>;
    async fn list_orders(&self, user: &User) -> ServiceResult<Vec<OrderView>>;
    async fn get_order(&self, user: &User, id: &ObjectId) -> ServiceResult<OrderView>;
    async fn update_status(&self, user: &User, id: &ObjectId, status: Option<OrderStatus>) -> ServiceResult<Order>;
    async fn delete_order(&self, user: &User, id: &ObjectId) -> ServiceResult<()>;
}

pub struct OrderServiceImpl {
    order_repo: Arc<dyn OrderRepository>,
    product_repo: Arc<dyn ProductRepository>,
    user_repo: Arc<dyn UserRepository>,
    store_repo: Arc<dyn StoreRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
    notifier: Arc<dyn Notifier>,
}

impl OrderServiceImpl {
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        product_repo: Arc<dyn ProductRepository>,
        user_repo: Arc<dyn UserRepository>,
        store_repo: Arc<dyn StoreRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { order_repo, product_repo, user_repo, store_repo, settings_repo, notifier }
    }

    async fn maintenance_enabled(&self) -> ServiceResult<bool> {
        Ok(self
            .settings_repo
            .find_by_key(MAINTENANCE_MODE_KEY)
            .await?
            .map(|s| s.as_bool())
            .unwrap_or(false))
    }

    async fn find_order(&self, id: &ObjectId) -> ServiceResult<Order> {
        self.order_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))
    }

    /// Snapshots the submitted lines, taking the Gold flag and missing details from the catalog
    async fn build_items(&self, inputs: Vec<OrderItemInput>) -> ServiceResult<Vec<OrderItem>> {
        let mut parsed = Vec::with_capacity(inputs.len());
        for input in inputs {
            let product = parse_optional_id(input.product.as_deref(), "Invalid product ID")?;
            let store_id = parse_optional_id(input.store_id.as_deref(), "Invalid store ID")?;
            parsed.push((input, product, store_id));
        }

        let ids: Vec<ObjectId> = parsed.iter().filter_map(|(_, product, _)| *product).collect();
        let catalog: HashMap<ObjectId, Product> = self
            .product_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        Ok(parsed
            .into_iter()
            .map(|(input, product, store_id)| {
                let current = product.and_then(|id| catalog.get(&id));
                let name = match (input.name.trim(), current) {
                    ("", Some(p)) => p.title.clone(),
                    (name, _) => name.to_string(),
                };
                OrderItem {
                    product,
                    name,
                    quantity: input.quantity,
                    price: input.price,
                    image: input.image.filter(|i| !i.trim().is_empty()),
                    store_id: store_id.or_else(|| current.and_then(|p| p.store_id)),
                    is_gold: current.map(|p| p.is_gold).unwrap_or(false),
                }
            })
            .collect())
    }

    async fn customer_contacts(&self, orders: &[Order]) -> HashMap<ObjectId, UserContact> {
        let ids: Vec<ObjectId> = orders
            .iter()
            .filter_map(|o| o.user)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        match self.user_repo.find_by_ids(&ids).await {
            Ok(users) => users
                .iter()
                .filter_map(|u| u.id.map(|id| (id, UserContact::from(u))))
                .collect(),
            Err(e) => {
                warn!("Could not resolve order customers: {}", e);
                HashMap::new()
            }
        }
    }

    async fn store_names(&self, store_ids: &[ObjectId]) -> HashMap<ObjectId, String> {
        match self.store_repo.find_by_ids(store_ids).await {
            Ok(stores) => stores.into_iter().filter_map(|s| s.id.map(|id| (id, s.name))).collect(),
            Err(e) => {
                warn!("Could not resolve order stores: {}", e);
                HashMap::new()
            }
        }
    }

    async fn views(&self, orders: Vec<Order>) -> Vec<OrderView> {
        let customers = self.customer_contacts(&orders).await;
        let store_ids: Vec<ObjectId> = orders
            .iter()
            .flat_map(|o| o.store_ids())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let names = self.store_names(&store_ids).await;

        orders
            .into_iter()
            .map(|order| {
                let customer = order.user.and_then(|id| customers.get(&id).cloned());
                let stores = order
                    .store_ids()
                    .into_iter()
                    .filter_map(|id| names.get(&id).map(|name| StoreRef { id, name: name.clone() }))
                    .collect();
                OrderView { order, customer, stores }
            })
            .collect()
    }

    /// Refunds the coin that paid for delivery on a freshly cancelled order
    async fn refund_coin(&self, cancelled: &Order) -> ServiceResult<()> {
        let Some(user_id) = cancelled.user else {
            return Ok(());
        };
        if cancelled.shipping != 0.0 || cancelled.has_gold_item() {
            return Ok(());
        }
        let gold_now = self
            .product_repo
            .find_by_ids(&cancelled.product_ids())
            .await?
            .iter()
            .any(|p| p.is_gold);
        if gold_now {
            debug!("Order {} shipped free through Gold, no refund", cancelled.short_ref());
            return Ok(());
        }
        if self.user_repo.credit_coin(&user_id).await? {
            info!("Refunded delivery coin for cancelled order {}", cancelled.short_ref());
        } else {
            warn!("Owner of cancelled order {} no longer exists, coin not refunded", cancelled.short_ref());
        }
        Ok(())
    }
}

fn parse_optional_id(raw: Option<&str>, message: &str) -> ServiceResult<Option<ObjectId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => ObjectId::parse_str(raw)
            .map(Some)
            .map_err(|_| ServiceError::InvalidInput(message.to_string())),
        None => Ok(None),
    }
}

/// Normalizes a client timestamp to UTC RFC 3339
fn parse_schedule(raw: Option<String>) -> ServiceResult<Option<String>> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|at| Some(at.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)))
            .map_err(|_| ServiceError::InvalidInput("Invalid scheduled delivery time".to_string())),
        None => Ok(None),
    }
}

fn shipping_address(input: ShippingAddressInput) -> ShippingAddress {
    let country = if input.country.trim().is_empty() { "India".to_string() } else { input.country };
    ShippingAddress {
        name: input.name,
        street: input.street,
        city: input.city,
        state: input.state,
        zip: input.zip,
        country,
        mobile: input.mobile,
    }
}

fn can_view(user: &User, order: &Order) -> bool {
    user.is_admin()
        || (order.user.is_some() && order.user == user.id)
        || user.managed_store().is_some_and(|store| order.contains_store(&store))
}

#[async_trait]
impl OrderService for OrderServiceImpl {
    #[instrument(skip(self, buyer, request), fields(items = request.items.len(), guest = buyer.is_none()))]
    async fn create_order(&self, buyer: Option<User>, request: CreateOrderRequest) -> ServiceResult<Order> {
        if request.items.is_empty() {
            return Err(ServiceError::InvalidInput("No order items".to_string()));
        }
        let is_admin = buyer.as_ref().is_some_and(User::is_admin);
        if !is_admin && self.maintenance_enabled().await? {
            warn!("Order rejected during maintenance");
            return Err(ServiceError::Unavailable("Store is under maintenance".to_string()));
        }

        let scheduled_delivery_time = parse_schedule(request.scheduled_delivery_time)?;
        let items = self.build_items(request.items).await?;
        let has_gold = items.iter().any(|i| i.is_gold);

        let mut totals = OrderTotals {
            subtotal: request.subtotal,
            shipping: request.shipping,
            tax: request.tax,
            discount: request.discount,
            total: request
                .total
                .unwrap_or(request.subtotal + request.shipping + request.tax - request.discount),
        };

        let buyer_id = buyer.as_ref().and_then(|u| u.id);
        let coins = buyer.as_ref().map(|u| u.coins).unwrap_or(0);
        let mut coin_spent = None;
        match plan_delivery_waiver(&totals, has_gold, coins) {
            DeliveryWaiver::Gold => {
                info!("Gold item in basket, delivery waived");
                totals = totals.waive_shipping();
            }
            DeliveryWaiver::Coin => {
                if let Some(user_id) = buyer_id {
                    if self.user_repo.debit_coin(&user_id).await? {
                        info!("Coin spent on delivery");
                        totals = totals.waive_shipping();
                        coin_spent = Some(user_id);
                    } else {
                        debug!("Coin balance changed before debit, charging delivery");
                    }
                }
            }
            DeliveryWaiver::None => {}
        }

        let mut order = Order {
            id: None,
            user: buyer_id,
            items,
            shipping_address: shipping_address(request.shipping_address),
            payment_method: request.payment_method.unwrap_or_else(PaymentMethod::default),
            subtotal: 0.0,
            shipping: 0.0,
            tax: 0.0,
            discount: 0.0,
            total: 0.0,
            status: OrderStatus::Processing,
            scheduled_delivery_time,
            delivered_at: None,
            created_at: None,
            updated_at: None,
        };
        order.apply_totals(totals);

        let order = match self.order_repo.create(order).await {
            Ok(order) => order,
            Err(e) => {
                error!("Failed to store order: {}", e);
                if let Some(user_id) = coin_spent {
                    match self.user_repo.credit_coin(&user_id).await {
                        Ok(_) => info!("Returned coin after failed order"),
                        Err(e) => error!("Failed to return coin after failed order: {}", e),
                    }
                }
                return Err(e.into());
            }
        };
        info!("Order {} placed", order.short_ref());

        if let Some(user_id) = buyer_id {
            let ship = &order.shipping_address;
            let address = Address {
                street: ship.street.clone(),
                city: ship.city.clone(),
                state: ship.state.clone(),
                zip: ship.zip.clone(),
                country: ship.country.clone(),
            };
            if let Err(e) = self.user_repo.update_contact(&user_id, &ship.mobile, &address).await {
                warn!("Could not save delivery details to profile: {}", e);
            }
        }

        let store_names = self.store_names(&order.store_ids()).await;
        self.notifier.order_placed(OrderNotice {
            order: order.clone(),
            customer: buyer.as_ref().map(UserContact::from),
            store_names,
        });

        Ok(order)
    }

    async fn list_orders(&self, user: &User) -> ServiceResult<Vec<OrderView>> {
        let user_id = user.id.ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        let scope = match (user.role, user.managed_store()) {
            (Role::Admin, _) => OrderScope::All,
            (Role::StoreAdmin, Some(store_id)) => OrderScope::Store { store_id, user_id },
            _ => OrderScope::Customer(user_id),
        };
        debug!(?scope, "Listing orders");
        let orders = self.order_repo.list(&scope).await?;
        Ok(self.views(orders).await)
    }

    async fn get_order(&self, user: &User, id: &ObjectId) -> ServiceResult<OrderView> {
        let order = self.find_order(id).await?;
        if !can_view(user, &order) {
            return Err(ServiceError::Forbidden("Not authorized to view this order".to_string()));
        }
        let mut views = self.views(vec![order]).await;
        views.pop().ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))
    }

    #[instrument(skip(self, user))]
    async fn update_status(&self, user: &User, id: &ObjectId, status: Option<OrderStatus>) -> ServiceResult<Order> {
        let order = self.find_order(id).await?;
        let is_owner = order.user.is_some() && order.user == user.id;
        let manages = user.is_admin() || user.managed_store().is_some_and(|store| order.contains_store(&store));

        if !manages {
            match status {
                Some(OrderStatus::Cancelled) if is_owner => {}
                _ if is_owner => {
                    return Err(ServiceError::Forbidden("You can only cancel your own orders".to_string()));
                }
                _ => return Err(ServiceError::Forbidden("Not authorized to update this order".to_string())),
            }
        }

        let Some(status) = status else {
            return Ok(order);
        };

        if status == OrderStatus::Cancelled {
            match self.order_repo.mark_cancelled(id).await? {
                Some(previous) => {
                    info!("Order {} cancelled", previous.short_ref());
                    self.refund_coin(&previous).await?;
                }
                None => debug!("Order {} was already cancelled", order.short_ref()),
            }
            return self.find_order(id).await;
        }

        let delivered_at = (status == OrderStatus::Delivered).then(now_timestamp);
        let updated = self.order_repo.update_status(id, status, delivered_at).await?;
        info!("Order {} is now {}", updated.short_ref(), status.as_str());
        Ok(updated)
    }

    async fn delete_order(&self, user: &User, id: &ObjectId) -> ServiceResult<()> {
        let order = self.find_order(id).await?;
        let is_owner = order.user.is_some() && order.user == user.id;
        if !user.is_admin() && !is_owner {
            return Err(ServiceError::Forbidden("Not authorized to delete this order".to_string()));
        }
        self.order_repo.delete(id).await?;
        info!("Order {} deleted", order.short_ref());
        Ok(())
    }
}
