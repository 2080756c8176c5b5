pub mod key;
pub mod target;

pub use key::content_key;
pub use target::TargetCache;
