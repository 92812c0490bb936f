//! Shared fixtures: every repository wired onto one in-memory store with
//! the default table layout.

#![allow(dead_code)]

use std::sync::Arc;

use api_lib::adapters::store::MemoryStore;
use fixit_core::repos::{
    ChatRepository, ProductRepository, ServiceProfileRepository, ServiceRequestRepository,
    UserRepository,
};

pub const PRODUCTS: &str = "fixit-products";
pub const PROFILES: &str = "fixit-service-profiles";
pub const REQUESTS: &str = "fixit-service-requests";
pub const CHAT: &str = "fixit-chat";
pub const USERS: &str = "fixit-users";
pub const COUNTERS: &str = "fixit-counters";

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(
        [PRODUCTS, PROFILES, REQUESTS, CHAT, USERS, COUNTERS].map(String::from),
    ))
}

pub fn product_repo(store: &Arc<MemoryStore>) -> ProductRepository {
    ProductRepository::new(store.clone(), PRODUCTS)
}

pub fn profile_repo(store: &Arc<MemoryStore>) -> ServiceProfileRepository {
    ServiceProfileRepository::new(store.clone(), PROFILES)
}

pub fn request_repo(store: &Arc<MemoryStore>) -> ServiceRequestRepository {
    ServiceRequestRepository::new(store.clone(), REQUESTS)
}

pub fn user_repo(store: &Arc<MemoryStore>) -> UserRepository {
    UserRepository::new(store.clone(), USERS, COUNTERS)
}

pub fn chat_repo(store: &Arc<MemoryStore>) -> ChatRepository {
    ChatRepository::new(store.clone(), CHAT)
}
