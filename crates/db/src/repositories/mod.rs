//! Repository implementations.

mod crud;
mod profile;

pub use crud::{CrudRepository, map_db_err};
pub use profile::ProfileRepository;
