//! Domain logic for concert drafting and roster review.
//!
//! Everything here is synchronous and free of I/O. Persistence of the
//! create-concert draft lives in `musicnbrain-drafts`.

pub mod concert;
pub mod dashboard;
pub mod drag;
pub mod error;
pub mod parsing;
pub mod performance;
pub mod program;
pub mod readiness;
pub mod review;
pub mod roster;
pub mod types;
