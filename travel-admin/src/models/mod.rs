//! Entity models
//!
//! The four record kinds the console manages, each described by an
//! [`EntitySchema`] so a single CRUD service can handle all of them.

pub mod category;
pub mod place;
pub mod review;
pub mod schema;
pub mod status;
pub mod user;

pub use category::Category;
pub use place::Place;
pub use review::Review;
pub use schema::{Entity, EntitySchema, StatusField};
pub use status::{Status, StatusRepr};
pub use user::User;
