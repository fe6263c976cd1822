//! Digest helpers used for request signing

use crate::errors::{self, CustomResult};

/// Generates a digest for the provided message
pub trait GenerateDigest {
    /// Takes a message and generates a digest for it
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, errors::ConnectorError>;
}

/// SHA-256 backed by `ring`
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;

impl GenerateDigest for Sha256 {
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, errors::ConnectorError> {
        let digest = ring::digest::digest(&ring::digest::SHA256, message);
        Ok(digest.as_ref().to_vec())
    }
}
