pub mod aggregate;
pub mod app;
pub mod bucket;
pub mod errors;
pub mod handlers;
pub mod history;
pub mod models;
pub mod range;
pub mod report;
pub mod state;
pub mod storage;
pub mod trend;

pub use app::router;
pub use errors::EngineError;
pub use report::{build_report, Report};
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
