//! n8n resources and data sources for n8nform
//!
//! Maps the Create/Read/Update/Delete/Import lifecycle of declared
//! resources onto the n8n public API.
//!
//! # Resource types
//!
//! - `n8n_workflow`: workflow definition, from attributes or a full export
//! - `n8n_workflow_activation`: the active flag of an existing workflow
//! - `n8n_credential`: write-only credential, never read back
//! - `n8n_user`: user and role; failed deletes only warn
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 n8nform CLI                  │
//! │       (plan / apply / refresh / import)      │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │               n8nform-provider               │
//! │  ┌────────────┐ ┌──────────┐ ┌────────────┐  │
//! │  │   Engine   │ │ Registry │ │ State file │  │
//! │  └────────────┘ └────┬─────┘ └────────────┘  │
//! │     trait Resource / trait DataSource        │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │        n8nform-client (REST, /api/v1)        │
//! └──────────────────────────────────────────────┘
//! ```

pub mod action;
pub mod data_source;
pub mod data_sources;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod state;

pub use action::{Action, ActionResult, ActionType, AddressedDiagnostic, ApplyResult, Plan, PlanSummary};
pub use data_source::{DataSource, DynDataSource};
pub use diagnostics::{Diagnostic, Severity};
pub use engine::Engine;
pub use error::{FieldError, ProviderError, Result};
pub use provider::{ConfiguredProvider, N8nProvider, ProviderSchemas, schemas};
pub use resource::{DynResource, Outcome, Resource};
pub use schema::{Attribute, AttributeType, Schema};
pub use state::{GlobalState, ResourceState, StateLock, StateManager};
