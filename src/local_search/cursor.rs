use crate::random::RandomSource;

/// A shuffled order of tour positions, handed out one at a time.
///
/// Partners for 2-opt and Or-opt are drawn from here. Positions that fail
/// the caller's validity test are skipped; running past the end reshuffles.
#[derive(Debug, Clone)]
pub struct PositionCursor {
    order: Vec<usize>,
    next: usize,
}

impl PositionCursor {
    /// A cursor over `0..n` in random order.
    pub fn new<R: RandomSource + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut order);
        Self { order, next: 0 }
    }

    /// The current order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Reshuffles and restarts from the front.
    pub fn reshuffle<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        rng.shuffle(&mut self.order);
        self.next = 0;
    }

    fn advance<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.next += 1;
        if self.next >= self.order.len() {
            self.reshuffle(rng);
        }
    }

    /// Returns the next position accepted by `valid`.
    ///
    /// Gives up with `None` after looking at as many positions as the order
    /// holds, so a tour without any valid partner cannot stall the caller.
    pub fn next_valid<R, F>(&mut self, rng: &mut R, mut valid: F) -> Option<usize>
    where
        R: RandomSource + ?Sized,
        F: FnMut(usize) -> bool,
    {
        if self.order.is_empty() {
            return None;
        }
        for _ in 0..self.order.len() {
            let candidate = self.order[self.next];
            self.advance(rng);
            if valid(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cursor_yields_each_position_once_per_round() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut cursor = PositionCursor::new(10, &mut rng);
        let mut seen: Vec<usize> = (0..10)
            .map(|_| cursor.next_valid(&mut rng, |_| true).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_cursor_skips_invalid() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut cursor = PositionCursor::new(10, &mut rng);
        let mut seen: Vec<usize> = (0..4)
            .map(|_| cursor.next_valid(&mut rng, |p| p % 3 == 0).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_cursor_gives_up() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut cursor = PositionCursor::new(6, &mut rng);
        assert_eq!(cursor.next_valid(&mut rng, |_| false), None);
    }
}
