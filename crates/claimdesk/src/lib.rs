#[macro_use]
extern crate log;

pub mod claims;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod route;
pub mod session;
pub mod token;

pub use claims::{Attachment, ClaimDraft, ClaimStore};
pub use config::Config;
pub use error::{Error, ErrorSet};
pub use guard::GuardOutcome;
pub use models::{Claim, ClaimStatus, GroupedClaims, Role, User};
pub use route::{Route, RouteMeta};
pub use session::SessionStore;
pub use token::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
