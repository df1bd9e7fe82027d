use std::sync::Arc;

use service::analytics::AnalyticsService;
use service::identity::IdentityProvider;
use service::inventory::InventoryService;
use service::repo::{BikeRepository, ProfileRepository, SaleRepository};
use service::sales::SalesService;
use service::storage::{BlobStore, UploadService};
use service::users::UserService;

/// Store, identity and blob handles the services are built from.
pub struct Backends {
    pub bikes: Arc<dyn BikeRepository>,
    pub sales: Arc<dyn SaleRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub blobs: Arc<dyn BlobStore>,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub enable_debug_routes: bool,
    pub max_upload_bytes: usize,
    pub secure_cookies: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { enable_debug_routes: false, max_upload_bytes: configs::DEFAULT_MAX_UPLOAD_BYTES, secure_cookies: false }
    }
}

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub inventory: Arc<InventoryService>,
    pub sales: Arc<SalesService>,
    pub analytics: Arc<AnalyticsService>,
    pub users: Arc<UserService>,
    pub uploads: Arc<UploadService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub settings: ServerSettings,
}

impl ServerState {
    pub fn new(backends: Backends, settings: ServerSettings) -> Self {
        let Backends { bikes, sales, profiles, identity, blobs } = backends;
        Self {
            inventory: Arc::new(InventoryService::new(bikes.clone())),
            sales: Arc::new(SalesService::new(sales.clone())),
            analytics: Arc::new(AnalyticsService::new(bikes, sales)),
            users: Arc::new(UserService::new(profiles, identity.clone())),
            uploads: Arc::new(UploadService::new(blobs, settings.max_upload_bytes)),
            identity,
            settings,
        }
    }
}
