//! Repositories over the social tables.
//!
//! Each repository borrows a [`crate::core::store::Store`] and opens one
//! scoped connection per call through its broker. Read projections that
//! join in another row (an author, a comment count) are computed at read
//! time; list calls skip rows whose projection can no longer be built.

pub mod events;
pub mod interests;
pub mod login_events;
pub mod messages;
pub mod notifications;
pub mod reports;
pub mod skillswap;
pub mod stories;
pub mod users;
