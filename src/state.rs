use crate::config::AppConfig;
use crate::models::Catalog;
use crate::services::forms::FormStore;
use crate::services::messaging::MessagingProvider;
use crate::services::registry::SchedulerRegistry;

pub struct AppState {
    pub config: AppConfig,
    pub messaging: Box<dyn MessagingProvider>,
    pub registry: SchedulerRegistry,
    pub forms: FormStore,
    pub catalog: Catalog,
}
