// Adapters layer: concrete implementations for external systems (the
// aggregator's HTTP API, local file storage).

pub mod okargo;
pub mod storage;

pub use okargo::OkargoClient;
pub use storage::LocalStorage;
