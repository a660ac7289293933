pub mod database;
pub mod memory;
pub mod metrics;
pub mod mutations;
pub mod store;

pub use database::MongoCatalogStore;
pub use memory::MemoryCatalogStore;
pub use metrics::{get_metrics, init_metrics, record_favorite_added, record_store_error};
pub use store::{CatalogStore, PullOutcome, SongOwner, StoreError, StoreOp};
