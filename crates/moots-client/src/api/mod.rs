//! Service bindings.

mod admin;
mod users;

pub use admin::AdminService;
pub use users::UserService;
