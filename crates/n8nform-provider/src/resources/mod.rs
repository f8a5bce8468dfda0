//! Managed resource types

pub mod credential;
pub mod user;
pub mod workflow;
pub mod workflow_activation;
pub mod workflow_document;

pub use credential::{CredentialModel, CredentialResource};
pub use user::{UserModel, UserResource};
pub use workflow::{WorkflowModel, WorkflowResource};
pub use workflow_activation::{WorkflowActivationModel, WorkflowActivationResource};
pub use workflow_document::{WorkflowDefinition, WorkflowDocument};
