use crate::model::order::{Order, OrderScope, OrderStatus};
use crate::repository::mongo::{now_timestamp, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Database;
use tracing::{info, instrument};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: Order) -> RepositoryResult<Order>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Order>>;
    /// Newest first
    async fn list(&self, scope: &OrderScope) -> RepositoryResult<Vec<Order>>;
    /// Moves the order to `Cancelled` unless it already is.
    ///
    /// Returns the order as it was before the change, or `None` when the order is
    /// missing or was already cancelled. Only one caller can ever get `Some` for a
    /// given order.
    async fn mark_cancelled(&self, id: &ObjectId) -> RepositoryResult<Option<Order>>;
    async fn update_status(&self, id: &ObjectId, status: OrderStatus, delivered_at: Option<String>) -> RepositoryResult<Order>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoOrderRepository {
    store: MongoStore<Order>,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        MongoOrderRepository { store: MongoStore::new(db, "orders", "order") }
    }
}

fn scope_filter(scope: &OrderScope) -> Document {
    match scope {
        OrderScope::All => doc! {},
        OrderScope::Customer(user_id) => doc! { "user": user_id },
        OrderScope::Store { store_id, user_id } => doc! {
            "$or": [ { "items.storeId": store_id }, { "user": user_id } ]
        },
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    async fn create(&self, mut order: Order) -> RepositoryResult<Order> {
        order.id = Some(ObjectId::new());
        let now = now_timestamp();
        order.created_at = Some(now.clone());
        order.updated_at = Some(now);
        self.store.insert(&order).await?;
        info!("Order {} stored", order.short_ref());
        Ok(order)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Order>> {
        self.store.find_by_id(id).await
    }

    async fn list(&self, scope: &OrderScope) -> RepositoryResult<Vec<Order>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        self.store.find_many(scope_filter(scope), Some(options)).await
    }

    async fn mark_cancelled(&self, id: &ObjectId) -> RepositoryResult<Option<Order>> {
        let options = FindOneAndUpdateOptions::builder().return_document(ReturnDocument::Before).build();
        let previous = self
            .store
            .collection()
            .find_one_and_update(
                doc! { "_id": id, "status": { "$ne": OrderStatus::Cancelled.as_str() } },
                doc! { "$set": { "status": OrderStatus::Cancelled.as_str(), "updatedAt": now_timestamp() } },
                options,
            )
            .await?;
        Ok(previous)
    }

    async fn update_status(&self, id: &ObjectId, status: OrderStatus, delivered_at: Option<String>) -> RepositoryResult<Order> {
        let mut set = doc! { "status": status.as_str(), "updatedAt": now_timestamp() };
        if let Some(delivered_at) = delivered_at {
            set.insert("deliveredAt", delivered_at);
        }
        let options = FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build();
        self.store
            .collection()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("No order found for ID: {}", id)))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_filters() {
        assert!(scope_filter(&OrderScope::All).is_empty());

        let user = ObjectId::new();
        assert_eq!(scope_filter(&OrderScope::Customer(user)).get_object_id("user").unwrap(), user);

        let store = ObjectId::new();
        let filter = scope_filter(&OrderScope::Store { store_id: store, user_id: user });
        assert_eq!(filter.get_array("$or").unwrap().len(), 2);
    }
}
