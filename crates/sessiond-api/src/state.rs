use std::sync::Arc;

use sessiond_core::services::SessionService;
use sessiond_infrastructure::PgPolicyRepository;
use sessiond_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService<PgPolicyRepository>>,
    pub config: AppConfig,
}
