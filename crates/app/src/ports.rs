//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod authorizer;
pub mod property_publisher;
pub mod storage;
pub mod token_manager;

pub use authorizer::Authorizer;
pub use property_publisher::PropertyPublisher;
pub use storage::{DeviceRepository, DeviceTemplateRepository, ServiceRepository};
pub use token_manager::TokenManager;
