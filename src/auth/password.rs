//! bcrypt hashing for administrator passwords. Both functions are CPU-bound; callers
//! on the async runtime go through `web::block`.

use crate::error::AppError;

/// Hashes `password` with a fresh salt at the given bcrypt cost (4..=31).
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Checks `password` against a stored hash. A malformed hash is an error, not a
/// mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, password_hash)?)
}
