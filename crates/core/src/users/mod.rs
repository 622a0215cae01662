//! Users module - account holders and their repository trait.

mod users_model;
mod users_traits;

pub use users_model::{NewUser, User};
pub use users_traits::UserRepositoryTrait;
