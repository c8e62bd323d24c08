pub mod random;

pub use random::RandomGenerator;

use shortloop_core::GenerateError;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Collision handling is the repository's responsibility: nothing here
/// guarantees two outputs are distinct.
pub trait Generator: Send + Sync + 'static {
    /// Produces one short code.
    fn generate(&self) -> Result<String, GenerateError>;
}
