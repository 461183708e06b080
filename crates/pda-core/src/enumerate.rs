//! Exhaustive word enumeration in odometer order.
//!
//! Words are produced shortest first. Within one length the word is read as
//! an odometer whose leftmost position is the fastest-turning digit and whose
//! lowest digit value is the first alphabet symbol, so `[a, b]` up to length
//! two gives `"", a, b, aa, ba, ab, bb`.

use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fresh,
    Running,
    Done,
}

/// Finite, deterministic generator of every word up to `max_len` symbols.
///
/// [`WordEnumerator::advance`] lends the current word without allocating;
/// the [`Iterator`] impl yields owned copies.
#[derive(Debug, Clone)]
pub struct WordEnumerator<'a, A> {
    alphabet: &'a [A],
    max_len: usize,
    digits: Vec<usize>,
    word: Vec<A>,
    phase: Phase,
    emitted: usize,
}

impl<'a, A: Clone> WordEnumerator<'a, A> {
    /// Creates an enumerator over `alphabet`, whose order defines the digit
    /// values. An empty alphabet yields only the empty word.
    #[must_use]
    pub const fn new(alphabet: &'a [A], max_len: usize) -> Self {
        Self {
            alphabet,
            max_len,
            digits: Vec::new(),
            word: Vec::new(),
            phase: Phase::Fresh,
            emitted: 0,
        }
    }

    /// Moves to the next word and lends it, or returns `None` once every word
    /// up to `max_len` has been produced.
    pub fn advance(&mut self) -> Option<&[A]> {
        match self.phase {
            Phase::Done => return None,
            Phase::Fresh => self.phase = Phase::Running,
            Phase::Running => {
                if !self.increment() && !self.extend() {
                    self.phase = Phase::Done;
                    return None;
                }
            }
        }
        self.emitted += 1;
        Some(&self.word)
    }

    /// Starts over from the empty word.
    pub fn restart(&mut self) {
        self.digits.clear();
        self.word.clear();
        self.phase = Phase::Fresh;
        self.emitted = 0;
    }

    /// Longest word this enumerator produces.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of words produced so far.
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// Turns the odometer by one. Returns false when every digit wrapped,
    /// meaning the current length is exhausted.
    fn increment(&mut self) -> bool {
        for (digit, symbol) in self.digits.iter_mut().zip(self.word.iter_mut()) {
            *digit += 1;
            if let Some(next) = self.alphabet.get(*digit) {
                *symbol = next.clone();
                return true;
            }
            *digit = 0;
            symbol.clone_from(&self.alphabet[0]);
        }
        false
    }

    /// Grows the all-lowest word by one digit, if the bound allows it.
    fn extend(&mut self) -> bool {
        if self.word.len() >= self.max_len {
            return false;
        }
        let Some(first) = self.alphabet.first() else {
            return false;
        };
        self.digits.push(0);
        self.word.push(first.clone());
        true
    }
}

impl<A: Clone> Iterator for WordEnumerator<'_, A> {
    type Item = Vec<A>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(<[A]>::to_vec)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.phase == Phase::Done {
            return (0, Some(0));
        }
        word_count(self.alphabet.len(), self.max_len).map_or((usize::MAX, None), |total| {
            let remaining = total - self.emitted;
            (remaining, Some(remaining))
        })
    }
}

impl<A: Clone> FusedIterator for WordEnumerator<'_, A> {}

/// Number of words of length `0..=max_len` over `alphabet_len` symbols, or
/// `None` when the count does not fit in `usize`.
#[must_use]
pub fn word_count(alphabet_len: usize, max_len: usize) -> Option<usize> {
    if alphabet_len == 0 {
        return Some(1);
    }
    let mut total = 0usize;
    let mut per_length = 1usize;
    for length in 0..=max_len {
        total = total.checked_add(per_length)?;
        if length < max_len {
            per_length = per_length.checked_mul(alphabet_len)?;
        }
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{word_count, WordEnumerator};

    fn render(words: impl Iterator<Item = Vec<char>>) -> Vec<String> {
        words.map(|word| word.into_iter().collect()).collect()
    }

    #[test]
    fn two_letters_up_to_two_in_odometer_order() {
        let alphabet = ['a', 'b'];
        let words = render(WordEnumerator::new(&alphabet, 2));
        assert_eq!(words, ["", "a", "b", "aa", "ba", "ab", "bb"]);
    }

    #[test]
    fn three_letters_turn_leftmost_digit_fastest() {
        let alphabet = ['x', 'y', 'z'];
        let words = render(WordEnumerator::new(&alphabet, 2));
        assert_eq!(
            words,
            ["", "x", "y", "z", "xx", "yx", "zx", "xy", "yy", "zy", "xz", "yz", "zz"]
        );
    }

    #[test]
    fn single_letter_alphabet_grows_one_word_per_length() {
        let alphabet = ['a'];
        let words = render(WordEnumerator::new(&alphabet, 3));
        assert_eq!(words, ["", "a", "aa", "aaa"]);
    }

    #[rstest]
    #[case::empty_alphabet(0, 5)]
    #[case::zero_bound(3, 0)]
    fn degenerate_inputs_yield_only_empty_word(#[case] size: usize, #[case] max_len: usize) {
        let alphabet: Vec<u8> = (0..u8::try_from(size).expect("small")).collect();
        let words: Vec<Vec<u8>> = WordEnumerator::new(&alphabet, max_len).collect();
        assert_eq!(words, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn advance_stays_exhausted() {
        let alphabet = ['a'];
        let mut enumerator = WordEnumerator::new(&alphabet, 1);

        assert_eq!(enumerator.advance(), Some(&[][..]));
        assert_eq!(enumerator.advance(), Some(&['a'][..]));
        assert_eq!(enumerator.advance(), None);
        assert_eq!(enumerator.advance(), None);
        assert_eq!(enumerator.emitted(), 2);
    }

    #[test]
    fn restart_replays_from_empty_word() {
        let alphabet = ['a', 'b'];
        let mut enumerator = WordEnumerator::new(&alphabet, 2);
        let first: Vec<Vec<char>> = enumerator.by_ref().take(4).collect();

        enumerator.restart();
        let second: Vec<Vec<char>> = enumerator.take(4).collect();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(0, 10, Some(1))]
    #[case(2, 0, Some(1))]
    #[case(2, 2, Some(7))]
    #[case(3, 3, Some(40))]
    #[case(2, 150, None)]
    fn word_count_sums_each_length(
        #[case] alphabet_len: usize,
        #[case] max_len: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(word_count(alphabet_len, max_len), expected);
    }

    #[test]
    fn size_hint_tracks_remaining_words() {
        let alphabet = ['a', 'b'];
        let mut enumerator = WordEnumerator::new(&alphabet, 2);
        assert_eq!(enumerator.size_hint(), (7, Some(7)));

        enumerator.advance();
        enumerator.advance();
        assert_eq!(enumerator.size_hint(), (5, Some(5)));
    }
}
