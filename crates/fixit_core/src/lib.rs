pub mod domain;
pub mod error;
pub mod ports;
pub mod repos;
pub mod store;

pub use domain::{
    ChatMessage, ChatRole, ChatTurn, NewProduct, NewServiceProfile, NewServiceRequest, NewUser,
    Product, ProductCategory, ProductPatch, Profession, RequestStatus, ServiceProfile,
    ServiceProfilePatch, ServiceRequest, User, UserPatch, UserRole,
};
pub use error::{CoreError, CoreResult};
pub use ports::AssistantService;
pub use repos::{
    ChatRepository, ProductRepository, ServiceProfileRepository, ServiceRequestRepository,
    UserRepository,
};
pub use store::{Condition, Delta, EntityStore, Item, Key, StoreError, StoreResult};
