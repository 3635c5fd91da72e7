//! Auth-domain value objects: attribute bags, scope lists, access tokens, and normalized users.

pub mod attributes;
pub mod scope;
pub mod token;
pub mod user;

pub use attributes::*;
pub use scope::*;
pub use token::{secret::*, *};
pub use user::*;
