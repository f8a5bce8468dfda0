pub mod apply;
pub mod data;
pub mod import;
pub mod plan;
pub mod refresh;
pub mod schema;
pub mod state;
