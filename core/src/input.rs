pub use key::{Key, ModifiedKey, NamedKey};
pub use notation::parse_keys;

pub mod key;
pub mod notation;
