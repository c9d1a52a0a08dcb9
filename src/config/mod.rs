pub mod traits;
pub mod mutation;
pub mod archive;
pub mod search;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use mutation::MutationConfig;
pub use archive::ArchiveConfig;
pub use search::SearchConfig;
