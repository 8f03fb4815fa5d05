pub mod models;
pub mod pool;
pub mod saved;
pub mod teas;
pub mod users;

pub use saved::SavedTeaStore;
pub use teas::TeaStore;
pub use users::UserStore;
