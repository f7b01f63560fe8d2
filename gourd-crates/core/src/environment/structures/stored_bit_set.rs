use crate::environment::Environment;
use crate::environment::StoredLong;

const WORD_SIZE: usize = 64;

/// A set of non-negative integers, packed into backtrackable 64-bit words.
///
/// Every word is a [`StoredLong`], so all modifications are undone on backtrack. The set grows
/// when a bit beyond its capacity is set; reading or clearing such a bit is allowed and behaves
/// as if the bit were absent.
#[derive(Debug, Clone)]
pub struct StoredBitSet {
    words: Vec<StoredLong>,
}

impl StoredBitSet {
    /// Creates an empty set which can hold at least `capacity` bits without growing.
    pub fn new(environment: &mut Environment, capacity: usize) -> Self {
        let mut bit_set = StoredBitSet { words: Vec::new() };
        bit_set.ensure_capacity(environment, capacity);
        bit_set
    }

    /// The number of bits the set can hold without growing.
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_SIZE
    }

    /// Makes sure bits `0..capacity` can be stored. New words are empty.
    pub fn ensure_capacity(&mut self, environment: &mut Environment, capacity: usize) {
        let num_words = capacity.div_ceil(WORD_SIZE);
        while self.words.len() < num_words {
            self.words.push(environment.make_long(0));
        }
    }

    fn word(&self, environment: &Environment, word_index: usize) -> u64 {
        self.words[word_index].get(environment) as u64
    }

    fn set_word(&self, environment: &mut Environment, word_index: usize, word: u64) {
        self.words[word_index].set(environment, word as i64)
    }

    pub fn get(&self, environment: &Environment, index: usize) -> bool {
        let word_index = index / WORD_SIZE;
        word_index < self.words.len()
            && self.word(environment, word_index) & (1 << (index % WORD_SIZE)) != 0
    }

    pub fn set(&mut self, environment: &mut Environment, index: usize) {
        self.ensure_capacity(environment, index + 1);

        let word_index = index / WORD_SIZE;
        let word = self.word(environment, word_index) | (1 << (index % WORD_SIZE));
        self.set_word(environment, word_index, word);
    }

    pub fn clear(&self, environment: &mut Environment, index: usize) {
        let word_index = index / WORD_SIZE;
        if word_index >= self.words.len() {
            return;
        }

        let word = self.word(environment, word_index) & !(1 << (index % WORD_SIZE));
        self.set_word(environment, word_index, word);
    }

    pub fn clear_all(&self, environment: &mut Environment) {
        for word_index in 0..self.words.len() {
            self.set_word(environment, word_index, 0);
        }
    }

    /// The smallest element which is at least `from`.
    pub fn next_set_bit(&self, environment: &Environment, from: usize) -> Option<usize> {
        let mut word_index = from / WORD_SIZE;
        if word_index >= self.words.len() {
            return None;
        }

        let mut word = self.word(environment, word_index) & (u64::MAX << (from % WORD_SIZE));
        loop {
            if word != 0 {
                return Some(word_index * WORD_SIZE + word.trailing_zeros() as usize);
            }
            word_index += 1;
            if word_index == self.words.len() {
                return None;
            }
            word = self.word(environment, word_index);
        }
    }

    /// The largest element which is at most `from`.
    pub fn prev_set_bit(&self, environment: &Environment, from: usize) -> Option<usize> {
        if self.words.is_empty() {
            return None;
        }

        let mut word_index = from / WORD_SIZE;
        let mut word = if word_index >= self.words.len() {
            word_index = self.words.len() - 1;
            self.word(environment, word_index)
        } else {
            self.word(environment, word_index) & (u64::MAX >> (WORD_SIZE - 1 - from % WORD_SIZE))
        };

        loop {
            if word != 0 {
                return Some(
                    word_index * WORD_SIZE + WORD_SIZE - 1 - word.leading_zeros() as usize,
                );
            }
            if word_index == 0 {
                return None;
            }
            word_index -= 1;
            word = self.word(environment, word_index);
        }
    }

    /// The smallest integer which is at least `from` and not in the set.
    pub fn next_clear_bit(&self, environment: &Environment, from: usize) -> usize {
        let mut word_index = from / WORD_SIZE;
        if word_index >= self.words.len() {
            return from;
        }

        let mut word = !self.word(environment, word_index) & (u64::MAX << (from % WORD_SIZE));
        loop {
            if word != 0 {
                return word_index * WORD_SIZE + word.trailing_zeros() as usize;
            }
            word_index += 1;
            if word_index == self.words.len() {
                return self.capacity();
            }
            word = !self.word(environment, word_index);
        }
    }

    /// The number of elements in the set.
    pub fn cardinality(&self, environment: &Environment) -> usize {
        (0..self.words.len())
            .map(|word_index| self.word(environment, word_index).count_ones() as usize)
            .sum()
    }

    pub fn is_empty(&self, environment: &Environment) -> bool {
        (0..self.words.len()).all(|word_index| self.word(environment, word_index) == 0)
    }

    /// Iterates over the elements in increasing order.
    pub fn iter<'a>(&'a self, environment: &'a Environment) -> impl Iterator<Item = usize> + 'a {
        let mut next = self.next_set_bit(environment, 0);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.next_set_bit(environment, current + 1);
            Some(current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_are_backtracked() {
        let mut environment = Environment::default();
        let mut bits = StoredBitSet::new(&mut environment, 10);
        bits.set(&mut environment, 3);

        environment.world_push();
        bits.set(&mut environment, 5);
        bits.clear(&mut environment, 3);

        assert!(bits.get(&environment, 5));
        assert!(!bits.get(&environment, 3));

        environment.world_pop();

        assert!(!bits.get(&environment, 5));
        assert!(bits.get(&environment, 3));
    }

    #[test]
    fn setting_beyond_the_capacity_grows() {
        let mut environment = Environment::default();
        let mut bits = StoredBitSet::new(&mut environment, 1);
        assert_eq!(64, bits.capacity());

        bits.set(&mut environment, 200);

        assert_eq!(256, bits.capacity());
        assert!(bits.get(&environment, 200));
        assert!(!bits.get(&environment, 1000));
    }

    #[test]
    fn searching_for_bits_crosses_words() {
        let mut environment = Environment::default();
        let mut bits = StoredBitSet::new(&mut environment, 256);
        for index in [2, 63, 64, 130] {
            bits.set(&mut environment, index);
        }

        assert_eq!(Some(2), bits.next_set_bit(&environment, 0));
        assert_eq!(Some(63), bits.next_set_bit(&environment, 3));
        assert_eq!(Some(130), bits.next_set_bit(&environment, 65));
        assert_eq!(None, bits.next_set_bit(&environment, 131));
        assert_eq!(None, bits.next_set_bit(&environment, 10_000));

        assert_eq!(Some(130), bits.prev_set_bit(&environment, 10_000));
        assert_eq!(Some(64), bits.prev_set_bit(&environment, 129));
        assert_eq!(Some(63), bits.prev_set_bit(&environment, 63));
        assert_eq!(None, bits.prev_set_bit(&environment, 1));

        assert_eq!(0, bits.next_clear_bit(&environment, 0));
        assert_eq!(65, bits.next_clear_bit(&environment, 63));
        assert_eq!(500, bits.next_clear_bit(&environment, 500));

        assert_eq!(4, bits.cardinality(&environment));
        assert_eq!(vec![2, 63, 64, 130], bits.iter(&environment).collect::<Vec<_>>());
    }

    #[test]
    fn next_clear_bit_of_a_full_set_is_its_capacity() {
        let mut environment = Environment::default();
        let mut bits = StoredBitSet::new(&mut environment, 64);
        for index in 0..64 {
            bits.set(&mut environment, index);
        }

        assert_eq!(64, bits.next_clear_bit(&environment, 0));
    }

    #[test]
    fn clear_all_empties_the_set_until_backtrack() {
        let mut environment = Environment::default();
        let mut bits = StoredBitSet::new(&mut environment, 128);
        bits.set(&mut environment, 1);
        bits.set(&mut environment, 100);

        environment.world_push();
        bits.clear_all(&mut environment);
        assert!(bits.is_empty(&environment));

        environment.world_pop();
        assert_eq!(2, bits.cardinality(&environment));
    }
}
