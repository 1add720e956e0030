//! Provably-fair, seeded random number stream.
//!
//! A [`FairRng`] is constructed from a secret `server_seed` and a public
//! `client_seed`. Before any play is simulated, the caller publishes
//! `server_seed_hash` (the SHA-256 commitment over `server_seed`); once the
//! game is complete, `server_seed` is revealed so any observer can replay
//! the exact sequence of draws by reconstructing a `FairRng` from the same
//! seeds and nonce start and checking it against `server_seed_hash`.

use hex::ToHex;
use hmac::{Hmac, Mac};
use rand::{Error, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Minimum length, in hex characters, a `server_seed` must satisfy.
pub const MIN_SERVER_SEED_HEX_CHARS: usize = 16;

/// # `FairRngRaw` struct
///
/// The unvalidated construction parameters for a [`FairRng`].
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct FairRngRaw {
    pub server_seed: String,
    pub client_seed: String,
}

impl FairRngRaw {
    /// Validate the raw seeds.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRngRaw;
    ///
    /// let raw = FairRngRaw {
    ///     server_seed: String::from("test-server-seed-aabbccdd11223344"),
    ///     client_seed: String::from("test-client-seed"),
    /// };
    /// assert!(raw.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if self.server_seed.len() < MIN_SERVER_SEED_HEX_CHARS {
            return Err(format!(
                "server_seed must be at least {} characters: {}",
                MIN_SERVER_SEED_HEX_CHARS,
                self.server_seed.len()
            ));
        }
        if self.client_seed.is_empty() {
            return Err(String::from("client_seed must not be empty"));
        }
        Ok(())
    }
}

/// # `FairRng` struct
///
/// A commit-reveal, nonce-advancing uniform source. Two `FairRng`s
/// constructed from identical seeds emit identical sequences; the RNG
/// never blocks, never allocates after construction, and never panics.
#[derive(Clone)]
pub struct FairRng {
    server_seed: String,
    client_seed: String,
    server_seed_hash: String,
    nonce: u64,
    cursor: u64,
    buffer: [u8; 32],
    buffer_pos: usize,
}

impl TryFrom<FairRngRaw> for FairRng {
    type Error = String;

    fn try_from(item: FairRngRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(FairRng::new(&item.server_seed, &item.client_seed))
    }
}

impl FairRng {
    /// Construct a new provably-fair RNG from a server seed and client
    /// seed, starting at `nonce = 0`.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRng;
    ///
    /// let rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
    /// assert_eq!(rng.nonce(), 0);
    /// assert_eq!(rng.server_seed_hash().len(), 64);
    /// ```
    pub fn new(server_seed: &str, client_seed: &str) -> FairRng {
        let server_seed_hash = Self::hash_seed(server_seed);
        FairRng {
            server_seed: String::from(server_seed),
            client_seed: String::from(client_seed),
            server_seed_hash,
            nonce: 0,
            cursor: 0,
            buffer: [0u8; 32],
            buffer_pos: 32,
        }
    }

    fn hash_seed(server_seed: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(server_seed.as_bytes());
        hasher.finalize().encode_hex::<String>()
    }

    /// The published commitment, `SHA-256(server_seed)`, as 64 hex chars.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRng;
    ///
    /// let rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
    /// assert_eq!(rng.server_seed_hash().len(), 64);
    /// ```
    pub fn server_seed_hash(&self) -> &str {
        &self.server_seed_hash
    }

    /// The secret seed. Only meant to be surfaced once the game this RNG
    /// backs has finished, so observers can replay it.
    pub fn server_seed(&self) -> &str {
        &self.server_seed
    }

    /// The public seed.
    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    /// Total number of `(nonce, cursor)` blocks drawn so far. This is the
    /// value recorded as `SimulatedGame.nonce` and must be reproducible on
    /// replay.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRng;
    ///
    /// let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
    /// let _ = rng.next_uniform();
    /// assert!(rng.nonce() > 0);
    /// ```
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Derive the next 32-byte HMAC-SHA256 block and reset the internal
    /// byte cursor used to serve individual `u32`/`u64` draws from it.
    fn refill(&mut self) {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        let message = format!("{}:{}:{}", self.client_seed, self.nonce, self.cursor);
        mac.update(message.as_bytes());
        self.buffer.copy_from_slice(&mac.finalize().into_bytes());
        self.buffer_pos = 0;
        self.cursor += 1;
    }

    /// Draw the next uniform value in `[0, 1)`.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRng;
    ///
    /// let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
    /// let value = rng.next_uniform();
    /// assert!((0.0..1.0).contains(&value));
    /// ```
    pub fn next_uniform(&mut self) -> f64 {
        let bytes = self.next_bytes::<8>();
        let as_u64 = u64::from_be_bytes(bytes);
        self.nonce += 1;
        // 53 bits of mantissa precision, matching f64's usable range.
        (as_u64 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        for slot in out.iter_mut() {
            if self.buffer_pos >= self.buffer.len() {
                self.refill();
            }
            *slot = self.buffer[self.buffer_pos];
            self.buffer_pos += 1;
        }
        out
    }

    /// Draw an inclusive uniform integer in `[lo, hi]`.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRng;
    ///
    /// let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
    /// let value = rng.next_int(1, 6);
    /// assert!((1..=6).contains(&value));
    /// ```
    pub fn next_int(&mut self, lo: i64, hi: i64) -> i64 {
        debug_assert!(lo <= hi);
        let span = (hi - lo + 1).max(1) as f64;
        lo + (self.next_uniform() * span).floor() as i64
    }

    /// Draw a weighted choice from `choices`, a slice of `(value, weight)`
    /// pairs. Ties in cumulative weight resolve to the first-listed option.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRng;
    ///
    /// let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
    /// let choices = [("run", 6.0), ("pass", 4.0)];
    /// let pick = rng.next_weighted(&choices);
    /// assert!(*pick == "run" || *pick == "pass");
    /// ```
    pub fn next_weighted<'a, T>(&mut self, choices: &'a [(T, f64)]) -> &'a T {
        let total: f64 = choices.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return &choices[0].0;
        }
        let mut roll = self.next_uniform() * total;
        for (value, weight) in choices {
            roll -= weight.max(0.0);
            if roll <= 0.0 {
                return value;
            }
        }
        &choices[choices.len() - 1].0
    }

    /// Fisher-Yates shuffle of `list` in place, using [`FairRng::next_int`]
    /// for each swap.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRng;
    ///
    /// let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
    /// let mut list = vec![1, 2, 3, 4, 5];
    /// rng.next_shuffle(&mut list);
    /// assert_eq!(list.len(), 5);
    /// ```
    pub fn next_shuffle<T>(&mut self, list: &mut [T]) {
        if list.len() < 2 {
            return;
        }
        for i in (1..list.len()).rev() {
            let j = self.next_int(0, i as i64) as usize;
            list.swap(i, j);
        }
    }

    /// Draw a Gaussian-distributed value via Box-Muller, paired with the
    /// given mean and standard deviation.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::rng::FairRng;
    ///
    /// let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
    /// let value = rng.next_gaussian(0.0, 1.0);
    /// assert!(value.is_finite());
    /// ```
    pub fn next_gaussian(&mut self, mean: f64, sd: f64) -> f64 {
        // Avoid u = 0 which would make ln(u) diverge.
        let u1 = (1.0 - self.next_uniform()).max(f64::MIN_POSITIVE);
        let u2 = self.next_uniform();
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + z0 * sd
    }
}

/// Allows a [`FairRng`] to be used anywhere `rand::Rng`/`rand_distr`
/// distributions expect an `RngCore`, so the resolver's truncated-Gaussian
/// and Bernoulli sampling can be expressed with `rand_distr` directly while
/// the underlying bytes are still derived deterministically from the
/// committed seeds.
impl RngCore for FairRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_be_bytes(self.next_bytes::<4>())
    }

    fn next_u64(&mut self) -> u64 {
        let bytes = self.next_bytes::<8>();
        u64::from_be_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_bytes::<8>();
            let n = chunk.len();
            chunk.copy_from_slice(&bytes[..n]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut a = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
        let mut b = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
        for _ in 0..25 {
            assert_eq!(a.next_uniform(), b.next_uniform());
        }
        assert_eq!(a.nonce(), b.nonce());
    }

    #[test]
    fn test_seed_sensitivity() {
        let mut a = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
        let mut b = FairRng::new("other-server-seed-aabbccdd1122334", "test-client-seed");
        let draws_a: Vec<f64> = (0..10).map(|_| a.next_uniform()).collect();
        let draws_b: Vec<f64> = (0..10).map(|_| b.next_uniform()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn test_hash_is_64_hex_chars() {
        let rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
        assert_eq!(rng.server_seed_hash().len(), 64);
        assert!(rng.server_seed_hash().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_validate_rejects_short_seed() {
        let raw = FairRngRaw {
            server_seed: String::from("short"),
            client_seed: String::from("client"),
        };
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_client_seed() {
        let raw = FairRngRaw {
            server_seed: String::from("test-server-seed-aabbccdd11223344"),
            client_seed: String::new(),
        };
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_next_int_in_range() {
        let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
        for _ in 0..200 {
            let v = rng.next_int(3, 7);
            assert!((3..=7).contains(&v));
        }
    }

    #[test]
    fn test_next_weighted_always_returns_listed_value() {
        let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
        let choices = [("a", 1.0), ("b", 1.0), ("c", 1.0)];
        for _ in 0..100 {
            let pick = rng.next_weighted(&choices);
            assert!(choices.iter().any(|(v, _)| v == pick));
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = FairRng::new("test-server-seed-aabbccdd11223344", "test-client-seed");
        let mut list: Vec<i32> = (0..10).collect();
        rng.next_shuffle(&mut list);
        let mut sorted = list.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<i32>>());
    }
}
