pub mod analysis;
pub mod common;
pub mod conversation;
pub mod session;
