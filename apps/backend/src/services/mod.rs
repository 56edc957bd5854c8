pub mod coordinator;
pub mod matchmaking;
pub mod sessions;


pub use coordinator::{CoordinatorSettings, SessionCoordinator};
pub use matchmaking::Matchmaker;
pub use sessions::{SessionRegistry, SharedSession};
