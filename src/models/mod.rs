//! Records exchanged with the myFlix API.
//!
//! Field names on the wire follow the server's PascalCase convention.

mod movie;
mod user;

pub use movie::{Director, Genre, Movie};
pub use user::{Credentials, LoginResponse, User, UserDetails, UserUpdate};
