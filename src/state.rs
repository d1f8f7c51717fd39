//! Shared application state, injected through axum's `State`.

use std::sync::Arc;

use crate::assets::AssetStore;
use crate::auth::{AdminAllowList, AuthService};
use crate::config::Config;
use crate::events::EventFeed;
use crate::registration::RegistrationService;
use crate::store::{NoticeStore, ProfileStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub events: Arc<EventFeed>,
    pub registrations: RegistrationService,
    pub notices: Arc<dyn NoticeStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub auth: Arc<dyn AuthService>,
    pub admins: AdminAllowList,
    pub assets: Arc<dyn AssetStore>,
}
