pub mod profiles;
pub mod store;
pub mod types;

pub use profiles::{builtin_profiles, detect_profile};
pub use store::{check_profile, load_profiles};
pub use types::{ColumnSpec, ColumnType, DatasetProfile, MissingPolicy, ReadOptions};
