pub mod catalog;
pub mod config;
pub mod domain;
pub mod lifecycle;

pub use catalog::{ModelCatalog, ModelInfo};
pub use domain::employee::Employee;
pub use domain::request::{
    CreationPayload, CustomField, LaptopRequest, StatusDetail, TicketMetadata, ValidationError,
    MODEL_ATTRIBUTE, MODEL_GROUP, MODEL_SENTINEL, REQUEST_TYPE_LAPTOP,
};
pub use lifecycle::{RequestState, TransitionError};
