use std::collections::VecDeque;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// The piece queue: a 7-bag randomizer plus the hold slot.
///
/// The queue is refilled with a freshly shuffled set of all seven kinds
/// whenever fewer than seven pieces remain, so the drawn sequence is a
/// concatenation of permutations and the preview never runs dry.
///
/// Holding is an explicit transition on the queue: the first hold stores the
/// current piece and draws the next one from the bag, later holds swap.
///
/// # Example
///
/// ```
/// use gentris_engine::{PieceBuffer, PieceSeed};
///
/// let mut buffer = PieceBuffer::with_seed(PieceSeed::from_u64(7));
/// let first = buffer.pop_next();
/// let upcoming: Vec<_> = buffer.preview(5).collect();
/// assert_eq!(upcoming.len(), 5);
///
/// // First hold draws from the queue.
/// assert_eq!(buffer.peek_hold_result(), upcoming[0]);
/// assert_eq!(buffer.hold(first), upcoming[0]);
/// assert_eq!(buffer.held_piece(), Some(first));
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
    held: Option<PieceKind>,
}

impl Default for PieceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// 128-bit seed for the piece queue's PCG32 generator.
///
/// Games created from equal seeds see the same piece sequence. Serialized as
/// a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    /// Expands a 64-bit seed into a full piece seed.
    ///
    /// ```
    /// use gentris_engine::PieceSeed;
    ///
    /// assert_eq!(PieceSeed::from_u64(42), PieceSeed::from_u64(42));
    /// assert_ne!(PieceSeed::from_u64(42), PieceSeed::from_u64(43));
    /// ```
    #[must_use]
    pub fn from_u64(seed: u64) -> Self {
        Pcg32::seed_from_u64(seed).random()
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        serializer.serialize_str(&format!("{num:032x}"))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex seed: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        u128::from_str_radix(&hex_str, 16)
            .map(|num| Self(num.to_be_bytes()))
            .map_err(|e| serde::de::Error::custom(format!("invalid hex seed: {hex_str} ({e})")))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceBuffer {
    /// Creates a queue seeded from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
            held: None,
        };
        this.refill();
        this
    }

    fn refill(&mut self) {
        while self.bag.len() < PieceKind::LEN {
            let mut set = PieceKind::ALL;
            set.shuffle(&mut self.rng);
            self.bag.extend(set);
        }
    }

    /// Draws the next piece from the queue.
    pub fn pop_next(&mut self) -> PieceKind {
        let piece = self
            .bag
            .pop_front()
            .expect("piece bag is refilled before it can empty");
        self.refill();
        piece
    }

    /// Iterates over every queued piece, next one first.
    ///
    /// Always yields at least seven pieces.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }

    /// The next `len` pieces (at most seven are guaranteed to be available).
    pub fn preview(&self, len: usize) -> impl Iterator<Item = PieceKind> + '_ {
        self.next_pieces().take(len)
    }

    /// Returns the piece [`Self::hold`] would hand out right now: the held
    /// piece, or the next queued piece when nothing is held yet.
    #[must_use]
    pub fn peek_hold_result(&self) -> PieceKind {
        self.held.unwrap_or(self.bag[0])
    }

    /// Stores `current` in the hold slot and returns the piece to play next.
    pub fn hold(&mut self, current: PieceKind) -> PieceKind {
        match self.held.replace(current) {
            Some(held) => held,
            None => self.pop_next(),
        }
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }
}
