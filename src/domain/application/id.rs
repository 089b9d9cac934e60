//! Short application identifiers.

use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Number of characters in an app id.
pub const APP_ID_LENGTH: usize = 4;

/// Reserved id handed to anonymous clients; never assigned to a registration.
pub const RESERVED_APP_ID: &str = "anon";

static APP_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{4}$").expect("app id pattern compiles"));

/// A validated 4-character alphanumeric application identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Parses a caller-supplied id. The reserved id parses fine (it is well-formed),
    /// it just never exists in storage.
    pub fn parse(raw: &str) -> Option<Self> {
        APP_ID_PATTERN
            .is_match(raw)
            .then(|| AppId(raw.to_string()))
    }

    /// Draws a random id from `[a-zA-Z0-9]`, redrawing while it equals the reserved id.
    ///
    /// Uniqueness against storage is the caller's job.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        loop {
            let candidate: String = (0..APP_ID_LENGTH)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect();
            if candidate != RESERVED_APP_ID {
                return AppId(candidate);
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_reserved(&self) -> bool {
        self.0 == RESERVED_APP_ID
    }

    /// Wraps a value read back from storage without re-validating it.
    pub(crate) fn from_stored(raw: String) -> Self {
        AppId(raw)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand::RngCore;

    #[test]
    fn generated_ids_are_four_alphanumerics_and_never_reserved() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let id = AppId::generate(&mut rng);
            assert_eq!(id.as_str().len(), APP_ID_LENGTH);
            assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(!id.is_reserved());
            assert!(AppId::parse(id.as_str()).is_some());
        }
    }

    /// Replays a fixed sequence of alphabet positions so the first draw spells `anon`.
    struct ScriptedRng {
        values: Vec<u32>,
        pos: usize,
    }

    impl rand::RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let v = self.values[self.pos % self.values.len()];
            self.pos += 1;
            v
        }
        fn next_u64(&mut self) -> u64 {
            self.next_u32() as u64
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            fill_from_words(self, dest)
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            fill_from_words(self, dest);
            Ok(())
        }
    }

    fn fill_from_words(rng: &mut ScriptedRng, dest: &mut [u8]) {
        for b in dest.iter_mut() {
            *b = rng.next_u32() as u8;
        }
    }

    // Alphanumeric samples `next_u32() >> 26` and indexes into
    // "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789".
    fn charset_word(index: u32) -> u32 {
        index << 26
    }

    #[test]
    fn reserved_draw_is_retried() {
        let a = charset_word(26);
        let n = charset_word(26 + 13);
        let o = charset_word(26 + 14);
        let z = charset_word(25);
        let mut rng = ScriptedRng {
            values: vec![a, n, o, n, z, z, z, z],
            pos: 0,
        };
        let id = AppId::generate(&mut rng);
        assert_eq!(id.as_str(), "ZZZZ");
    }

    #[test]
    fn step_rng_still_yields_valid_ids() {
        let mut rng = StepRng::new(0, 1 << 26);
        let id = AppId::generate(&mut rng);
        assert_eq!(id.as_str(), "ABCD");
    }

    #[test]
    fn parse_requires_exactly_four_alphanumerics() {
        assert!(AppId::parse("aB3x").is_some());
        assert!(AppId::parse("anon").is_some());
        assert!(AppId::parse("abc").is_none());
        assert!(AppId::parse("abcde").is_none());
        assert!(AppId::parse("ab-d").is_none());
        assert!(AppId::parse("").is_none());
        assert!(AppId::parse("äbcd").is_none());
    }
}
