//! Response parsing helpers shared by the operation modules.
#[cfg(feature = "mdna")]
pub mod markup;
pub mod utils;
