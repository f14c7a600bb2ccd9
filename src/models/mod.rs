pub mod movie;
pub mod review;
pub mod user;

pub use movie::*;
pub use review::*;
pub use user::*;
