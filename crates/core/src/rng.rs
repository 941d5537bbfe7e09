//! RNG module - token generation for fills and refills
//!
//! Every token the engine creates (initial fill, refill after gravity, falling
//! tokens in drop mode, shuffles) comes from a [`TokenSource`]. Games own their
//! source, so the same seed always replays the same game.
//!
//! Also provides a simple LCG for deterministic generation.

use crate::types::{Cell, Token};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Where new tokens come from.
pub trait TokenSource {
    /// Draw one token from the first `kinds` symbols of the alphabet.
    fn next_token(&mut self, kinds: u8) -> Token;

    /// Permute cells in place.
    fn shuffle(&mut self, cells: &mut [Cell]);
}

/// Uniform random tokens from a seeded [`SimpleRng`].
#[derive(Debug, Clone)]
pub struct SeededTokens {
    seed: u32,
    rng: SimpleRng,
}

impl SeededTokens {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: SimpleRng::new(seed),
        }
    }

    /// Seed this source was created with.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for SeededTokens {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TokenSource for SeededTokens {
    fn next_token(&mut self, kinds: u8) -> Token {
        let kinds = kinds.max(1);
        let index = self.rng.next_range(u32::from(kinds)) as u8;
        Token::wrapping(index)
    }

    fn shuffle(&mut self, cells: &mut [Cell]) {
        self.rng.shuffle(cells);
    }
}

/// Replays a fixed token list, wrapping around at the end.
///
/// Tokens outside the requested alphabet are folded back into it with a modulo,
/// so a script never yields a kind the game does not know. Shuffling reverses
/// the slice, which keeps scripted games fully predictable.
#[derive(Debug, Clone)]
pub struct ScriptedTokens {
    script: Vec<Token>,
    pos: usize,
}

impl ScriptedTokens {
    pub fn new(script: Vec<Token>) -> Self {
        Self { script, pos: 0 }
    }

    /// Build a script from token letters; other characters are skipped.
    ///
    /// ```
    /// use autumn_burst_core::rng::{ScriptedTokens, TokenSource};
    ///
    /// let mut src = ScriptedTokens::from_letters("AB C");
    /// let drawn: String = (0..4).map(|_| src.next_token(8).as_char()).collect();
    /// assert_eq!(drawn, "ABCA");
    /// ```
    pub fn from_letters(letters: &str) -> Self {
        Self::new(letters.chars().filter_map(Token::from_char).collect())
    }

    /// Number of tokens drawn so far.
    pub fn drawn(&self) -> usize {
        self.pos
    }
}

impl TokenSource for ScriptedTokens {
    fn next_token(&mut self, kinds: u8) -> Token {
        let kinds = kinds.max(1);
        let raw = if self.script.is_empty() {
            0
        } else {
            self.script[self.pos % self.script.len()].index()
        };
        self.pos += 1;
        Token::wrapping(raw % kinds)
    }

    fn shuffle(&mut self, cells: &mut [Cell]) {
        cells.reverse();
    }
}
