//! Database models split into domain-specific modules.

pub mod craving;
pub mod dish;
pub mod favorite;
pub mod order;
pub mod restaurant;
pub mod review;
pub mod subscription;
pub mod user;

pub use craving::*;
pub use dish::*;
pub use favorite::*;
pub use order::*;
pub use restaurant::*;
pub use review::*;
pub use subscription::*;
pub use user::*;
