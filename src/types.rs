use serde::Serialize;

/// Number of obligors that defaulted in a single draw. Always in `[0, N]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DefaultCount(pub u64);

/// Position of a draw in the loss sequence (0-based, draw order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DrawIndex(pub usize);

/// Fixed-size slice of the draw range that owns one random stream.
///
/// The partition depends only on the draw count, never on how many worker
/// threads run, so a seed reproduces the same losses on any machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockIndex(pub usize);

impl BlockIndex {
    pub const DRAWS_PER_BLOCK: usize = 4096;

    /// First draw owned by this block.
    pub fn first_draw(self) -> DrawIndex {
        DrawIndex(self.0 * Self::DRAWS_PER_BLOCK)
    }

    /// ChaCha stream id for this block.
    pub fn stream(self) -> u64 {
        self.0 as u64
    }
}
