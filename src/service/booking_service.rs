use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument, warn};

use crate::dto::booking_dto::ServiceListingInput;
use crate::model::service_listing::ServiceListing;
use crate::model::service_request::{ServiceRequest, ServiceRequestStatus, ServiceRequestView};
use crate::model::user::{User, UserContact};
use crate::repository::mongo::now_timestamp;
use crate::repository::service_listing_repo::ServiceListingRepository;
use crate::repository::service_request_repo::ServiceRequestRepository;
use crate::repository::user_repo::UserRepository;
use crate::service::notification_service::Notifier;
use crate::util::error::{ServiceError, ServiceResult};
use crate::util::notice::ServiceRequestNotice;

/// Bookable services and the requests customers raise against them
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn list_services(&self) -> ServiceResult<Vec<ServiceListing>>;
    async fn create_service(&self, input: ServiceListingInput) -> ServiceResult<ServiceListing>;
    async fn update_service(&self, id: &ObjectId, input: ServiceListingInput) -> ServiceResult<ServiceListing>;
    async fn delete_service(&self, id: &ObjectId) -> ServiceResult<()>;

    async fn create_request(&self, user: &User, service_id: Option<&str>) -> ServiceResult<ServiceRequestView>;
    async fn list_requests(&self) -> ServiceResult<Vec<ServiceRequestView>>;
    async fn update_request_status(&self, id: &ObjectId, status: ServiceRequestStatus) -> ServiceResult<ServiceRequestView>;
    async fn delete_request(&self, id: &ObjectId) -> ServiceResult<()>;
}

pub struct BookingServiceImpl {
    listing_repo: Arc<dyn ServiceListingRepository>,
    request_repo: Arc<dyn ServiceRequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl BookingServiceImpl {
    pub fn new(
        listing_repo: Arc<dyn ServiceListingRepository>,
        request_repo: Arc<dyn ServiceRequestRepository>,
        user_repo: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { listing_repo, request_repo, user_repo, notifier }
    }

    async fn find_service(&self, id: &ObjectId) -> ServiceResult<ServiceListing> {
        self.listing_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Service not found".to_string()))
    }

    async fn find_request(&self, id: &ObjectId) -> ServiceResult<ServiceRequest> {
        self.request_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Service Request not found".to_string()))
    }

    async fn populate(&self, requests: Vec<ServiceRequest>) -> ServiceResult<Vec<ServiceRequestView>> {
        let user_ids: Vec<ObjectId> = requests.iter().map(|r| r.user).collect();
        let service_ids: Vec<ObjectId> = requests.iter().map(|r| r.service).collect();

        let users: HashMap<ObjectId, UserContact> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .iter()
            .filter_map(|u| u.id.map(|id| (id, UserContact::from(u))))
            .collect();
        let services: HashMap<ObjectId, ServiceListing> = self
            .listing_repo
            .find_by_ids(&service_ids)
            .await?
            .into_iter()
            .filter_map(|s| s.id.map(|id| (id, s)))
            .collect();

        Ok(requests
            .into_iter()
            .map(|r| {
                let user = users.get(&r.user).cloned();
                let service = services.get(&r.service).cloned();
                ServiceRequestView::new(r, user, service)
            })
            .collect())
    }
}

#[async_trait]
impl BookingService for BookingServiceImpl {
    async fn list_services(&self) -> ServiceResult<Vec<ServiceListing>> {
        Ok(self.listing_repo.list_active().await?)
    }

    #[instrument(skip(self, input))]
    async fn create_service(&self, input: ServiceListingInput) -> ServiceResult<ServiceListing> {
        let name = input
            .name
            .clone()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("Service name is required".to_string()))?;
        let mut listing = ServiceListing::new(name);
        input.apply(&mut listing);
        let created = self.listing_repo.create(listing).await?;
        info!("Service {} created", created.name);
        Ok(created)
    }

    #[instrument(skip(self, input))]
    async fn update_service(&self, id: &ObjectId, input: ServiceListingInput) -> ServiceResult<ServiceListing> {
        let mut listing = self.find_service(id).await?;
        input.apply(&mut listing);
        Ok(self.listing_repo.update(id, listing).await?)
    }

    async fn delete_service(&self, id: &ObjectId) -> ServiceResult<()> {
        self.find_service(id).await?;
        self.listing_repo.delete(id).await?;
        info!("Service {} removed", id);
        Ok(())
    }

    #[instrument(skip(self, user))]
    async fn create_request(&self, user: &User, service_id: Option<&str>) -> ServiceResult<ServiceRequestView> {
        let raw = service_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("Service ID is required".to_string()))?;
        let not_found = || ServiceError::NotFound("Service not found".to_string());
        let service_id = ObjectId::parse_str(raw).map_err(|_| not_found())?;
        let service = self.listing_repo.get_by_id(&service_id).await?.ok_or_else(not_found)?;
        let user_id = user.id.ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let request = ServiceRequest {
            id: None,
            user: user_id,
            service: service_id,
            status: ServiceRequestStatus::Pending,
            request_date: now_timestamp(),
            created_at: None,
            updated_at: None,
        };
        let created = self.request_repo.create(request).await?;
        info!("Service request created for {}", service.name);

        let customer = UserContact::from(user);
        self.notifier.service_requested(ServiceRequestNotice {
            request: created.clone(),
            customer: Some(customer.clone()),
            service: Some(service.clone()),
        });

        Ok(ServiceRequestView::new(created, Some(customer), Some(service)))
    }

    async fn list_requests(&self) -> ServiceResult<Vec<ServiceRequestView>> {
        let requests = self.request_repo.list().await?;
        self.populate(requests).await
    }

    #[instrument(skip(self))]
    async fn update_request_status(&self, id: &ObjectId, status: ServiceRequestStatus) -> ServiceResult<ServiceRequestView> {
        self.find_request(id).await?;
        self.request_repo.update_status(id, status).await?;
        info!("Service request {} is now {}", id, status.as_str());
        let updated = self.find_request(id).await?;
        let mut views = self.populate(vec![updated]).await?;
        views.pop().ok_or_else(|| {
            warn!("Service request {} vanished during update", id);
            ServiceError::NotFound("Service Request not found".to_string())
        })
    }

    async fn delete_request(&self, id: &ObjectId) -> ServiceResult<()> {
        self.find_request(id).await?;
        self.request_repo.delete(id).await?;
        info!("Service request {} removed", id);
        Ok(())
    }
}
