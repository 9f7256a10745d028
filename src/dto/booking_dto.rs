use serde::Deserialize;
use validator::Validate;

use crate::model::service_listing::ServiceListing;
use crate::model::service_request::ServiceRequestStatus;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListingInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub is_active: Option<bool>,
}

impl ServiceListingInput {
    pub fn apply(self, service: &mut ServiceListing) {
        if let Some(name) = self.name {
            service.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            service.description = description;
        }
        if let Some(image) = self.image {
            service.image = image.trim().to_string();
        }
        if let Some(address) = self.address {
            service.address = address;
        }
        if let Some(mobile) = self.mobile {
            service.mobile = mobile;
        }
        if let Some(active) = self.is_active {
            service.is_active = active;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequestRequest {
    pub service_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateServiceRequestStatusRequest {
    pub status: ServiceRequestStatus,
}
