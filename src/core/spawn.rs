//! Timer-driven spawning and difficulty-weighted variant selection.

use super::geometry::Rect;
use rand::Rng;

/// Countdown that fires when enough time has passed for the current
/// difficulty. The effective interval shrinks as difficulty grows but never
/// drops below `floor_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    pub timer_ms: f64,
    pub interval_ms: f64,
    pub floor_ms: f64,
    pub ease_ms_per_difficulty: f64,
}

impl Spawner {
    pub fn new(interval_ms: f64, floor_ms: f64, ease_ms_per_difficulty: f64) -> Self {
        Self {
            timer_ms: 0.0,
            interval_ms,
            floor_ms: floor_ms.max(1.0),
            ease_ms_per_difficulty,
        }
    }

    /// Interval in effect at `difficulty`.
    pub fn effective_interval(&self, difficulty: f64) -> f64 {
        (self.interval_ms - difficulty * self.ease_ms_per_difficulty).max(self.floor_ms)
    }

    /// True once the timer has reached the effective interval. Does not reset;
    /// call `reset` after a successful spawn so a blocked spawn stays primed.
    pub fn is_due(&self, difficulty: f64) -> bool {
        self.timer_ms >= self.effective_interval(difficulty)
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.timer_ms += dt_ms;
    }

    /// Advance and, if due, reset. Returns whether a spawn should happen.
    pub fn tick(&mut self, dt_ms: f64, difficulty: f64) -> bool {
        self.advance(dt_ms);
        if self.is_due(difficulty) {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.timer_ms = 0.0;
    }

    /// Replace the base interval, e.g. with a fresh random draw.
    pub fn reroll(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }
}

/// Weighted distribution whose weights shift with difficulty.
///
/// Each entry's weight is `base + per_difficulty * (difficulty - 1)`, with the
/// difficulty term floored at zero, so entries with a positive
/// `per_difficulty` become more likely as the session gets harder.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable<T> {
    entries: Vec<(T, f64, f64)>,
}

impl<T: Copy> WeightedTable<T> {
    pub fn new(entries: Vec<(T, f64, f64)>) -> Self {
        Self { entries }
    }

    pub fn weight(&self, index: usize, difficulty: f64) -> f64 {
        self.entries
            .get(index)
            .map(|(_, base, per)| (base + per * (difficulty - 1.0).max(0.0)).max(0.0))
            .unwrap_or(0.0)
    }

    /// Probability of entry `index` at `difficulty`.
    pub fn probability(&self, index: usize, difficulty: f64) -> f64 {
        let total: f64 = (0..self.entries.len())
            .map(|i| self.weight(i, difficulty))
            .sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.weight(index, difficulty) / total
    }

    /// Draw one value. Returns `None` only for an empty or all-zero table.
    pub fn pick<R: Rng + ?Sized>(&self, difficulty: f64, rng: &mut R) -> Option<T> {
        let total: f64 = (0..self.entries.len())
            .map(|i| self.weight(i, difficulty))
            .sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = rng.gen_range(0.0..total);
        for (i, (value, _, _)) in self.entries.iter().enumerate() {
            let w = self.weight(i, difficulty);
            if roll < w {
                return Some(*value);
            }
            roll -= w;
        }
        self.entries.last().map(|(value, _, _)| *value)
    }
}

/// True if `candidate` keeps at least `min_gap` horizontal pixels from every
/// rectangle in `existing`.
pub fn clear_of<'a, I>(existing: I, candidate: &Rect, min_gap: f64) -> bool
where
    I: IntoIterator<Item = &'a Rect>,
{
    existing.into_iter().all(|r| {
        let gap = if r.x >= candidate.right() {
            r.x - candidate.right()
        } else if candidate.x >= r.right() {
            candidate.x - r.right()
        } else {
            -1.0
        };
        gap >= min_gap
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawner_fires_at_interval() {
        let mut s = Spawner::new(100.0, 50.0, 0.0);
        assert!(!s.tick(60.0, 1.0));
        assert!(s.tick(60.0, 1.0));
        assert_eq!(s.timer_ms, 0.0);
    }

    #[test]
    fn test_spawner_interval_has_floor() {
        let s = Spawner::new(1500.0, 500.0, 200.0);
        assert_eq!(s.effective_interval(1.0), 1300.0);
        assert_eq!(s.effective_interval(5.0), 500.0);
        assert_eq!(s.effective_interval(1_000.0), 500.0);
    }

    #[test]
    fn test_spawner_floor_never_zero() {
        let s = Spawner::new(0.0, 0.0, 10.0);
        assert!(s.effective_interval(100.0) > 0.0);
    }

    #[test]
    fn test_spawner_higher_difficulty_fires_sooner() {
        let mut easy = Spawner::new(2000.0, 800.0, 100.0);
        let mut hard = easy.clone();
        let mut easy_ticks = 0;
        while !easy.tick(16.0, 1.0) {
            easy_ticks += 1;
        }
        let mut hard_ticks = 0;
        while !hard.tick(16.0, 5.0) {
            hard_ticks += 1;
        }
        assert!(hard_ticks < easy_ticks);
    }

    #[test]
    fn test_weights_shift_with_difficulty() {
        let table = WeightedTable::new(vec![("easy", 2.0, 0.0), ("hard", 1.0, 0.5)]);
        let p1 = table.probability(1, 1.0);
        let p5 = table.probability(1, 5.0);
        assert!((p1 - 1.0 / 3.0).abs() < 1e-9);
        assert!(p5 > p1);
    }

    #[test]
    fn test_weights_ignore_difficulty_below_one() {
        let table = WeightedTable::new(vec![("a", 1.0, 0.0), ("b", 1.0, 1.0)]);
        assert_eq!(table.weight(1, 0.5), 1.0);
    }

    #[test]
    fn test_pick_respects_zero_weight() {
        let table = WeightedTable::new(vec![("never", 0.0, 0.0), ("always", 1.0, 0.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(table.pick(1.0, &mut rng), Some("always"));
        }
    }

    #[test]
    fn test_pick_empty_table() {
        let table: WeightedTable<u8> = WeightedTable::new(Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(table.pick(1.0, &mut rng), None);
    }

    #[test]
    fn test_pick_distribution_roughly_matches_weights() {
        let table = WeightedTable::new(vec![(0u8, 8.0, 0.0), (1u8, 1.0, 0.0), (2u8, 1.0, 0.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            counts[table.pick(1.0, &mut rng).unwrap() as usize] += 1;
        }
        assert!(counts[0] > 7_500 && counts[0] < 8_500, "{counts:?}");
    }

    #[test]
    fn test_clear_of_min_gap() {
        let existing = [Rect::new(0.0, 0.0, 60.0, 30.0)];
        let near = Rect::new(70.0, 0.0, 60.0, 30.0);
        let far = Rect::new(200.0, 0.0, 60.0, 30.0);
        assert!(!clear_of(&existing, &near, 20.0));
        assert!(clear_of(&existing, &far, 20.0));
        assert!(!clear_of(&existing, &Rect::new(10.0, 0.0, 5.0, 5.0), 0.0));
    }
}
