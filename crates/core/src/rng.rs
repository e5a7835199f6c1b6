use rand::{rngs::StdRng, seq::SliceRandom, RngCore, SeedableRng};

/// Seeded generator behind every shuffle and generated id. The seed is kept
/// so a deal can be printed and replayed.
#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh seed from the OS; the seed stays readable for replays.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Lowercase base-36 token, as used for opaque companion-app ids.
    pub fn base36_token(&mut self, len: usize) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        (0..len)
            .map(|_| ALPHABET[(self.next_u64() % 36) as usize] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_shuffle() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        RngState::from_seed(9).shuffle(&mut a);
        RngState::from_seed(9).shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn base36_token_has_requested_length() {
        let token = RngState::from_seed(1).base36_token(9);
        assert_eq!(token.len(), 9);
        assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
