use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::io::read_corpus;
use super::distribution::CharDistribution;

/// A fixed-order character-level Markov model.
///
/// Maps every context window (the most recent `window_length` characters)
/// seen during training to the frequency distribution of the character that
/// followed it, then generates new text by sliding-window sampling from
/// those distributions.
///
/// # Responsibilities
/// - Build the context map from one or more corpus passes
/// - Finalize counts into probability / cumulative-probability tables
/// - Extend a seed text by repeated inverse-CDF sampling
///
/// # Invariants
/// - `window_length` is always >= 1 and fixed at construction
/// - Every key in the context map has exactly `window_length` characters
/// - The context map only grows; counts are cumulative across `train` calls
///
/// # Notes
/// - The random source is owned by the instance: every sampling call advances
///   it, so two `generate` calls on the same model are order-dependent unless
///   the model is rebuilt with the same seed.
/// - Not thread-safe; wrap in a `Mutex` for shared use.
pub struct LanguageModel {
	/// The window length used by this model (the Markov order).
	window_length: usize,
	/// Maps windows to their next-character distributions.
	context_map: HashMap<String, CharDistribution>,
	/// The random source used for sampling.
	rng: StdRng,
}

impl LanguageModel {
	/// Creates a model with the given window length and an OS-seeded random
	/// source. Generating from this model multiple times produces different
	/// texts.
	///
	/// # Errors
	/// Returns an error if `window_length` is 0.
	pub fn new(window_length: usize) -> Result<Self, String> {
		Self::with_rng(window_length, StdRng::from_os_rng())
	}

	/// Creates a model with the given window length and a deterministic
	/// random source. Two models built with the same seed and trained on
	/// identical corpora generate identical texts. Good for debugging.
	///
	/// # Errors
	/// Returns an error if `window_length` is 0.
	pub fn with_seed(window_length: usize, seed: u64) -> Result<Self, String> {
		Self::with_rng(window_length, StdRng::seed_from_u64(seed))
	}

	fn with_rng(window_length: usize, rng: StdRng) -> Result<Self, String> {
		if window_length == 0 {
			return Err("window_length must be >= 1".to_owned());
		}
		Ok(Self { window_length, context_map: HashMap::new(), rng })
	}

	/// The window length this model was built with.
	pub fn window_length(&self) -> usize {
		self.window_length
	}

	/// Number of distinct windows observed so far.
	pub fn len(&self) -> usize {
		self.context_map.len()
	}

	/// True if no training has produced any transition yet.
	pub fn is_empty(&self) -> bool {
		self.context_map.is_empty()
	}

	/// The next-character distribution for `window`, if it was observed.
	pub fn distribution(&self, window: &str) -> Option<&CharDistribution> {
		self.context_map.get(window)
	}

	/// Trains the model on the text in the given file (the corpus).
	///
	/// # Errors
	/// Returns an error if the file cannot be read.
	pub fn train<P: AsRef<Path>>(&mut self, filepath: P) -> io::Result<()> {
		let corpus = read_corpus(filepath)?;
		self.train_stream(corpus.chars());
		Ok(())
	}

	/// Trains the model on a character stream, consumed exactly once.
	///
	/// The first `window_length` characters seed the initial window and are
	/// not themselves recorded as transitions. Every subsequent character is
	/// recorded in the distribution of the current window, then the window
	/// slides forward by one character.
	///
	/// After the stream is exhausted, probabilities are recomputed for every
	/// distribution currently in the map, so repeated training is cumulative
	/// in counts and probabilities always reflect all counts seen so far.
	///
	/// # Notes
	/// - A corpus shorter than `window_length` records nothing.
	/// - UTF-8 safe: windows slide by characters, not bytes.
	pub fn train_stream<I>(&mut self, chars: I)
	where
		I: IntoIterator<Item = char>,
	{
		let mut chars = chars.into_iter();

		let mut window = String::new();
		for _ in 0..self.window_length {
			match chars.next() {
				Some(c) => window.push(c),
				None => break,
			}
		}

		if window.chars().count() == self.window_length {
			for c in chars {
				let distribution = self
					.context_map
					.entry(window.clone())
					.or_insert_with(CharDistribution::new);
				distribution.record(c);

				// Advance the window: drop its first character, append c.
				window.remove(0);
				window.push(c);
			}
		}

		for distribution in self.context_map.values_mut() {
			distribution.finalize_probabilities();
		}
	}

	/// Generates text based on the probabilities learned during training.
	///
	/// Starts from the trailing `window_length` characters of `initial_text`
	/// and appends `extra_length` sampled characters, sliding the window
	/// after each draw.
	///
	/// Degenerate cases, none of which are errors:
	/// - `initial_text` shorter than the window: returned unchanged (no
	///   window can be formed);
	/// - the trailing window was never observed: returned unchanged;
	/// - an unobserved window reached mid-generation: generation stops early
	///   and the text produced so far is returned.
	///
	/// On the success path the result is `initial_text` plus exactly
	/// `extra_length` characters.
	pub fn generate(&mut self, initial_text: &str, extra_length: usize) -> String {
		if initial_text.chars().count() < self.window_length {
			return initial_text.to_owned();
		}

		let mut window = Self::last_n_chars(initial_text, self.window_length);
		if !self.context_map.contains_key(&window) {
			return initial_text.to_owned();
		}

		let mut generated = initial_text.to_owned();
		for _ in 0..extra_length {
			let next_char = match self.context_map.get(&window) {
				Some(distribution) => distribution.sample(&mut self.rng),
				None => break,
			};
			generated.push(next_char);
			window.remove(0);
			window.push(next_char);
		}
		generated
	}

	/// Returns the last `n` characters of a string.
	///
	/// # Notes
	/// - Handles UTF-8 correctly (multibyte characters).
	/// - If `n` exceeds the character count, the entire string is returned.
	fn last_n_chars(s: &str, n: usize) -> String {
		if n > s.chars().count() {
			return s.to_owned();
		}
		s.chars()
			.rev()
			.take(n)
			.collect::<Vec<_>>()
			.into_iter()
			.rev()
			.collect()
	}
}

/// Human-readable dump of the context map, one window per line.
/// A debugging aid, not part of the model contract.
impl fmt::Display for LanguageModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (window, distribution) in &self.context_map {
			writeln!(f, "{} : {}", window, distribution)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::LanguageModel;

	fn trained(corpus: &str, window_length: usize, seed: u64) -> LanguageModel {
		let mut model = LanguageModel::with_seed(window_length, seed).unwrap();
		model.train_stream(corpus.chars());
		model
	}

	#[test]
	fn zero_window_length_is_rejected() {
		assert!(LanguageModel::new(0).is_err());
		assert!(LanguageModel::with_seed(0, 1).is_err());
		assert!(LanguageModel::with_seed(1, 1).is_ok());
	}

	#[test]
	fn training_records_windows_and_first_seen_counts() {
		let model = trained("abcab", 2, 0);

		assert_eq!(model.len(), 3);
		for (window, next) in [("ab", 'c'), ("bc", 'a'), ("ca", 'b')] {
			let distribution = model.distribution(window).unwrap();
			assert_eq!(distribution.len(), 1);
			let entry = &distribution.entries()[0];
			assert_eq!(entry.character, next);
			assert_eq!(entry.count, 1);
			assert!((entry.p - 1.0).abs() < 1e-9);
			assert!((entry.cp - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn finalized_distributions_are_valid_probability_tables() {
		let model = trained("the theme of the thesis", 3, 0);

		assert!(!model.is_empty());
		for window in ["the", "he ", "e t"] {
			let distribution = model.distribution(window).unwrap();
			let sum: f64 = distribution.entries().iter().map(|e| e.p).sum();
			assert!((sum - 1.0).abs() < 1e-9);

			let mut previous = 0.0;
			for entry in distribution.entries() {
				assert!(entry.count >= 1);
				assert!(entry.cp >= previous);
				previous = entry.cp;
			}
			assert!((previous - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn repeated_training_doubles_counts_but_not_probabilities() {
		let corpus = "aababb";
		let mut model = trained(corpus, 1, 0);

		let before: Vec<(char, usize, f64, f64)> = model
			.distribution("a")
			.unwrap()
			.entries()
			.iter()
			.map(|e| (e.character, e.count, e.p, e.cp))
			.collect();

		model.train_stream(corpus.chars());

		let after: Vec<(char, usize, f64, f64)> = model
			.distribution("a")
			.unwrap()
			.entries()
			.iter()
			.map(|e| (e.character, e.count, e.p, e.cp))
			.collect();

		assert_eq!(before.len(), after.len());
		for ((c1, count1, p1, cp1), (c2, count2, p2, cp2)) in before.iter().zip(&after) {
			assert_eq!(c1, c2);
			assert_eq!(count1 * 2, *count2);
			assert!((p1 - p2).abs() < 1e-9);
			assert!((cp1 - cp2).abs() < 1e-9);
		}
	}

	#[test]
	fn corpus_shorter_than_window_records_nothing() {
		let model = trained("ab", 5, 0);
		assert!(model.is_empty());
	}

	#[test]
	fn short_initial_text_is_returned_unchanged() {
		let mut model = trained("abcabc", 2, 0);
		assert_eq!(model.generate("a", 10), "a");
		assert_eq!(model.generate("", 10), "");
	}

	#[test]
	fn unseen_trailing_window_is_returned_unchanged() {
		let mut model = trained("abcabc", 2, 0);
		assert_eq!(model.generate("zz", 10), "zz");
		// The window is the trailing characters, not the whole input.
		assert_eq!(model.generate("zzzab", 3).chars().count(), 8);
	}

	#[test]
	fn success_path_produces_exactly_the_requested_length() {
		// "abcabc" with window 2 forms a closed cycle, so every window
		// reached during generation is present in the map.
		let mut model = trained("abcabc", 2, 0);
		let generated = model.generate("ab", 50);
		assert_eq!(generated.chars().count(), 52);
		assert!(generated.starts_with("ab"));
	}

	#[test]
	fn same_seed_and_corpus_generate_identical_text() {
		let corpus = "the quick brown fox jumps over the lazy dog and the cat";
		let mut first = trained(corpus, 3, 1234);
		let mut second = trained(corpus, 3, 1234);
		assert_eq!(first.generate("the", 40), second.generate("the", 40));
	}

	#[test]
	fn multibyte_characters_slide_correctly() {
		let mut model = trained("héhéhé", 2, 0);
		let generated = model.generate("hé", 6);
		assert_eq!(generated.chars().count(), 8);
	}
}
