pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod overview;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use state::AppState;
pub use storage::{resolve_db_path, VisitStore};
