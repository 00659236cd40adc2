pub mod deletion;
pub mod mapping;
pub mod schema;
pub mod store;

pub use crate::domain::model::{DeletePolicy, DeletionPlan};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
