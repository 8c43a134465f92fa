//! RNG trait abstraction for the grid simulation
//!
//! Every random decision the engine makes (color sampling, lifetimes, acid,
//! steam condensation) goes through this trait so a seeded generator
//! reproduces a run exactly.

/// Source of randomness for particle creation and reactions
pub trait WorldRng {
    /// Uniform f32 in `[0.0, 1.0)`
    fn gen_f32(&mut self) -> f32;

    /// True with the given probability; 0 never fires, 1 always does
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }

    /// Lifetime roll in `min..=max`
    fn gen_range_u32(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as f32 + 1.0;
        min + ((self.gen_f32() * span) as u32).min(max - min)
    }
}

impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }

    fn gen_range_u32(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        rand::Rng::gen_range(self, min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    struct FixedRng(f32);

    impl WorldRng for FixedRng {
        fn gen_f32(&mut self) -> f32 {
            self.0
        }
    }

    #[test]
    fn test_probability_extremes() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        assert!((0..200).all(|_| rng.check_probability(1.0)));
        assert!((0..200).all(|_| !rng.check_probability(0.0)));
    }

    #[test]
    fn test_acid_chance_hits_roughly_its_rate() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(99);
        let hits = (0..10_000).filter(|_| rng.check_probability(0.2)).count();
        assert!((1_700..2_300).contains(&hits), "{hits} hits");
    }

    #[test]
    fn test_lifetime_rolls_stay_in_range() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        for _ in 0..500 {
            let roll = rng.gen_range_u32(30, 60);
            assert!((30..=60).contains(&roll));
        }
        assert_eq!(rng.gen_range_u32(5, 5), 5);
        assert_eq!(rng.gen_range_u32(9, 3), 9);
    }

    #[test]
    fn test_fallback_range_reaches_both_ends() {
        assert_eq!(FixedRng(0.0).gen_range_u32(10, 20), 10);
        assert_eq!(FixedRng(0.9999).gen_range_u32(10, 20), 20);
        assert_eq!(FixedRng(0.5).gen_range_u32(0, 1), 1);
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = Xoshiro256StarStar::seed_from_u64(42);
        let mut b = Xoshiro256StarStar::seed_from_u64(42);
        let rolls = |rng: &mut Xoshiro256StarStar| {
            (0..50).map(|_| rng.gen_range_u32(0, 1000)).collect::<Vec<_>>()
        };
        assert_eq!(rolls(&mut a), rolls(&mut b));
    }
}
