pub mod repo;
pub mod repo_types;

pub use repo::UserStore;
pub use repo_types::{NewUser, User, UserChanges, UserSort, UserStoreError};
