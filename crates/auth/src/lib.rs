//! `marketledger-auth`: user credential records.
//!
//! Users have no identity record of their own: the credential pair is the
//! ledger key and the stored value is an opaque hash supplied by the caller.
//! Nothing here derives or verifies that hash.

pub mod user;

pub use user::{RegisterUser, UserKey, UserRecord};
