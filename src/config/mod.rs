pub mod settings;

pub use settings::{AppConfig, PaginateSettings, TransportSettings};
