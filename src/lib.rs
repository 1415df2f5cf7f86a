pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod settings;
pub mod storage;

pub use api::{ApiClient, Backend};
pub use config::AppConfig;
pub use error::{ApiError, StorageError};
pub use models::{
    CaptureResult, DailyPlan, DailyPlanLookup, FocusTask, Settings, SettingsUpdate, Task,
};
pub use settings::{SettingsResolver, SERVER_URL_KEY};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
