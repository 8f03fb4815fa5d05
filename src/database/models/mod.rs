pub mod saved_tea;
pub mod tea;
pub mod user;

pub use saved_tea::SavedTea;
pub use tea::{NewTea, Tea};
pub use user::User;
