use crate::generator::Generator;
use rand::Rng;
use shortloop_core::GenerateError;

/// Alphabet the generated codes draw from: alphanumerics plus underscore,
/// 63 symbols. With the default length of 10 the code space is 63^10.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// A fixed-length random code generator.
///
/// Each character is drawn independently and uniformly from [`ALPHABET`]
/// using `rand::rng()`, a cryptographically secure source.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of `length` characters.
    ///
    /// Fails with [`GenerateError::InvalidLength`] when `length` is zero.
    pub fn new(length: usize) -> Result<Self, GenerateError> {
        if length == 0 {
            return Err(GenerateError::InvalidLength);
        }
        Ok(Self { length })
    }

    /// The configured code length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> Result<String, GenerateError> {
        let mut rng = rand::rng();
        let code = (0..self.length)
            .map(|_| {
                let idx = rng.random_range(0..ALPHABET.len());
                ALPHABET[idx] as char
            })
            .collect();
        Ok(code)
    }
}
