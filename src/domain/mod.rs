pub mod user;
pub mod name;
pub mod collation;
pub mod profile;

pub use user::*;
pub use name::*;
pub use collation::*;
pub use profile::*;
