use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::service_listing::ServiceListing;
use crate::model::user::UserContact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ServiceRequestStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRequestStatus::Pending => "Pending",
            ServiceRequestStatus::InProgress => "In Progress",
            ServiceRequestStatus::Completed => "Completed",
            ServiceRequestStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub service: ObjectId,
    #[serde(default)]
    pub status: ServiceRequestStatus,
    pub request_date: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Service request with its user and service resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestView {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user: Option<UserContact>,
    pub service: Option<ServiceListing>,
    pub status: ServiceRequestStatus,
    pub request_date: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ServiceRequestView {
    pub fn new(request: ServiceRequest, user: Option<UserContact>, service: Option<ServiceListing>) -> Self {
        ServiceRequestView {
            id: request.id,
            user,
            service,
            status: request.status,
            request_date: request.request_date,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}
