use std::collections::HashMap;
use std::fmt;

use rand::Rng;

/// One observed "next character" outcome within a context window.
///
/// `p` and `cp` stay at 0.0 until [`CharDistribution::finalize_probabilities`]
/// runs; only `count` is meaningful during training.
#[derive(Clone, Debug)]
pub struct CharEntry {
	/// The observed character.
	pub character: char,
	/// How many times this character followed the window.
	pub count: usize,
	/// Relative frequency of this character within the window (count / total).
	pub p: f64,
	/// Running sum of `p` over the entry order, used for inverse-CDF sampling.
	pub cp: f64,
}

/// Observed frequency/probability table of "next character" outcomes for one
/// context window.
///
/// Entries are kept in first-seen order; that order defines which entry wins
/// when cumulative probabilities tie during sampling. A side index gives O(1)
/// duplicate detection during training, so recording stays cheap even for
/// large alphabets, while sampling scans linearly (distributions are bounded
/// by alphabet size).
///
/// # Invariants (post-finalization)
/// - Every entry has `count >= 1` (an entry exists only because it was observed)
/// - `p` values sum to 1.0 within floating-point tolerance
/// - `cp` is non-decreasing over the entry order and the last `cp` is ~1.0
#[derive(Clone, Debug, Default)]
pub struct CharDistribution {
	/// Entries in first-occurrence order.
	entries: Vec<CharEntry>,
	/// Character -> position in `entries`.
	index: HashMap<char, usize>,
}

impl CharDistribution {
	/// Creates an empty distribution.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `character`.
	///
	/// - If the character was already seen for this window, its count is increased.
	/// - Otherwise a new entry is appended with an initial count of 1,
	///   preserving first-seen order.
	pub fn record(&mut self, character: char) {
		match self.index.get(&character) {
			Some(&position) => self.entries[position].count += 1,
			None => {
				self.index.insert(character, self.entries.len());
				self.entries.push(CharEntry { character, count: 1, p: 0.0, cp: 0.0 });
			}
		}
	}

	/// Computes the `p` and `cp` fields of every entry from the raw counts.
	///
	/// `p` is the unconditional relative frequency within this window;
	/// `cp` is the running sum of `p` in entry order.
	///
	/// # Notes
	/// - Idempotent: re-running with unchanged counts yields the same values.
	/// - A no-op on an empty distribution.
	pub fn finalize_probabilities(&mut self) {
		let total: usize = self.entries.iter().map(|entry| entry.count).sum();
		if total == 0 {
			return;
		}
		let mut sum = 0.0;
		for entry in &mut self.entries {
			entry.p = entry.count as f64 / total as f64;
			sum += entry.p;
			entry.cp = sum;
		}
	}

	/// Draws a pseudo-random character according to the finalized probabilities.
	///
	/// Draws `r` uniformly from `[0, 1)` and returns the character of the
	/// first entry (in stored order) whose cumulative probability reaches `r`,
	/// making the distribution act as an inverse-CDF lookup table.
	///
	/// Returns `' '` if no entry qualifies. This can only happen on an empty
	/// distribution or when rounding leaves the last `cp` just below `r`;
	/// it is a defined fallback, not an error.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> char {
		let r: f64 = rng.random();
		for entry in &self.entries {
			if entry.cp >= r {
				return entry.character;
			}
		}
		' '
	}

	/// Entries in first-seen order.
	pub fn entries(&self) -> &[CharEntry] {
		&self.entries
	}

	/// Number of distinct characters observed.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True if nothing has been recorded yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl fmt::Display for CharDistribution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for entry in &self.entries {
			write!(f, "({} {} {:.4} {:.4})", entry.character, entry.count, entry.p, entry.cp)?;
		}
		Ok(())
	}
}
