//! services/api/src/web/state.rs
//!
//! The shared application state, created once at startup and passed to all
//! handlers.

use std::sync::Arc;

use crate::config::Config;
use fixit_core::ports::AssistantService;
use fixit_core::repos::{
    ChatRepository, ProductRepository, ServiceProfileRepository, ServiceRequestRepository,
    UserRepository,
};
use fixit_core::store::EntityStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub products: ProductRepository,
    pub profiles: ServiceProfileRepository,
    pub requests: ServiceRequestRepository,
    pub users: UserRepository,
    pub chat: ChatRepository,
    /// `None` when no API key is configured; the AI route then serves a
    /// static offline message instead of failing.
    pub assistant: Option<Arc<dyn AssistantService>>,
}

impl AppState {
    /// Wire every repository onto one store using the configured tables.
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn EntityStore>,
        assistant: Option<Arc<dyn AssistantService>>,
    ) -> Self {
        let tables = &config.tables;
        Self {
            products: ProductRepository::new(store.clone(), &tables.products),
            profiles: ServiceProfileRepository::new(store.clone(), &tables.profiles),
            requests: ServiceRequestRepository::new(store.clone(), &tables.requests),
            users: UserRepository::new(store.clone(), &tables.users, &tables.counters),
            chat: ChatRepository::new(store, &tables.chat),
            config,
            assistant,
        }
    }
}
