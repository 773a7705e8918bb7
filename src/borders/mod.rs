//! Border index: loads the world country-borders dataset once per session.
//!
//! The dataset is read-only after load; callers share it behind an `Arc`.

mod dataset;
mod loader;
mod overrides;

pub use dataset::BorderDataset;
pub use loader::DatasetSource;
pub use overrides::CodeOverrides;
