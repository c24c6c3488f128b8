pub mod presence;
pub mod punch_type;
pub mod role;
pub mod store;
pub mod user;
