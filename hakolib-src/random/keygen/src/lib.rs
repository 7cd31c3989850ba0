use std::ops::Range;

use rand::{
    distributions::{Distribution, Uniform},
    seq::SliceRandom,
    Rng,
};

pub trait Gen {
    type Output;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output;
}

/// `len` distinct keys from `bound`, in random order.
pub struct Shuffled<B> {
    pub bound: B,
    pub len: usize,
}

/// `len` keys sampled with repetition, so equal keys are common.
pub struct WithDupes<B> {
    pub bound: B,
    pub len: usize,
}

impl Gen for Range<i32> {
    type Output = i32;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let between = Uniform::from(self.clone());
        between.sample(rng)
    }
}

impl Gen for Shuffled<Range<i32>> {
    type Output = Vec<i32>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let Self { bound: Range { start, end }, len } = self;
        assert!(*len as i64 <= (*end as i64 - *start as i64));

        let mut pool: Vec<_> = (*start..*end).collect();
        pool.shuffle(rng);
        pool.truncate(*len);
        pool
    }
}

impl Gen for WithDupes<Range<i32>> {
    type Output = Vec<i32>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let Self { bound, len } = self;
        (0..*len).map(|_| bound.clone().generate(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use crate::{Gen, Shuffled, WithDupes};

    #[test]
    fn shuffled_is_a_permutation() {
        let mut rng = ChaCha20Rng::from_seed([0; 32]);
        for _ in 0..100 {
            let mut keys = Shuffled { bound: -8..8, len: 16 }.generate(&mut rng);
            keys.sort_unstable();
            assert_eq!(keys, (-8..8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn shuffled_respects_len() {
        let mut rng = ChaCha20Rng::from_seed([1; 32]);
        let keys = Shuffled { bound: 0..100, len: 10 }.generate(&mut rng);
        assert_eq!(keys.len(), 10);
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
    }

    #[test]
    fn with_dupes_stays_in_bound() {
        let mut rng = ChaCha20Rng::from_seed([2; 32]);
        let keys = WithDupes { bound: 0..4, len: 1000 }.generate(&mut rng);
        assert_eq!(keys.len(), 1000);
        assert!(keys.iter().all(|x| (0..4).contains(x)));
        // with 1000 draws from 4 values a repeat is certain
        let mut sorted = keys;
        sorted.sort_unstable();
        sorted.dedup();
        assert!(sorted.len() < 1000);
    }
}
