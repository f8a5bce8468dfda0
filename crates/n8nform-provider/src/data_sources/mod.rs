//! Data source types

pub mod credential;
pub mod user;
pub mod workflow;

pub use credential::{CredentialDataModel, CredentialDataSource};
pub use user::{UserDataModel, UserDataSource};
pub use workflow::{WorkflowDataModel, WorkflowDataSource};
