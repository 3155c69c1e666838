//! Password hashing capability
//!
//! Only the user directory and the demo seeder hash passwords. Both take the
//! hasher as a trait object so tests and embedders can substitute their own.

use crate::error::{CoreError, Result};
use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::Argon2;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
	/// Hash a plaintext password into a self-describing string
	fn hash(&self, plaintext: &str) -> Result<String>;

	/// Check a plaintext password against a stored hash
	fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id with default parameters, producing PHC strings
#[derive(Default)]
pub struct Argon2Hasher {
	argon2: Argon2<'static>,
}

impl Argon2Hasher {
	pub fn new() -> Self {
		Self::default()
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, plaintext: &str) -> Result<String> {
		let salt = SaltString::generate(&mut OsRng);
		self.argon2
			.hash_password(plaintext.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| CoreError::Internal(format!("Failed to hash password: {}", e)))
	}

	fn verify(&self, plaintext: &str, hash: &str) -> bool {
		match PasswordHash::new(hash) {
			Ok(parsed) => self
				.argon2
				.verify_password(plaintext.as_bytes(), &parsed)
				.is_ok(),
			Err(_) => false,
		}
	}
}
