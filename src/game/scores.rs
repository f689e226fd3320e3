/// Running score for one session. Only ever grows; a new session starts a
/// new accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreAccumulator {
    total: u64,
}

impl ScoreAccumulator {
    pub const fn new() -> Self {
        Self { total: 0 }
    }

    #[inline(always)]
    pub fn apply(&mut self, delta: u32) {
        self.total = self.total.saturating_add(u64::from(delta));
    }

    #[inline(always)]
    pub const fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::ScoreAccumulator;

    #[test]
    fn sums_deltas() {
        let mut score = ScoreAccumulator::new();
        score.apply(100);
        score.apply(0);
        score.apply(200);
        assert_eq!(score.total(), 300);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let mut score = ScoreAccumulator { total: u64::MAX - 50 };
        score.apply(100);
        assert_eq!(score.total(), u64::MAX);
    }
}
