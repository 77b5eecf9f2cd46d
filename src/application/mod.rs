pub mod comments;
pub mod engagement;
pub mod likes;
pub mod ratings;

/// Upper bound on re-reads after losing a natural-key race. Every retry means
/// another writer committed in between, so hitting this takes sustained contention
/// on a single `(user, target)` pair.
pub const MAX_STORE_RETRIES: usize = 16;
