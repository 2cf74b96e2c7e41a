//! Parameter store — the user-adjustable inputs of one lesson instance.

use rand::Rng;

pub const INPUT_MIN: u8 = 0;
pub const INPUT_MAX: u8 = 100;
pub const DEFAULT_INPUT: u8 = 15;
pub const DEFAULT_ARRAY: [i32; 3] = [10, 20, 30];

/// Pushed array values are drawn from `0..PUSH_VALUE_BOUND`.
pub const PUSH_VALUE_BOUND: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamStore {
    input_value: u8,
    loop_count: u64,
    array_data: Vec<i32>,
}

impl Default for ParamStore {
    fn default() -> Self {
        ParamStore {
            input_value: DEFAULT_INPUT,
            loop_count: 0,
            array_data: DEFAULT_ARRAY.to_vec(),
        }
    }
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_value(&self) -> u8 {
        self.input_value
    }

    /// Clamped to `INPUT_MIN..=INPUT_MAX`.
    pub fn set_input_value(&mut self, value: i32) {
        self.input_value = value.clamp(INPUT_MIN as i32, INPUT_MAX as i32) as u8;
    }

    pub fn loop_count(&self) -> u64 {
        self.loop_count
    }

    pub fn set_loop(&mut self, count: u64) {
        self.loop_count = count;
    }

    pub fn bump_loop(&mut self, by: u64) {
        self.loop_count = self.loop_count.saturating_add(by);
    }

    pub fn reset_loop(&mut self) {
        self.loop_count = 0;
    }

    pub fn array_data(&self) -> &[i32] {
        &self.array_data
    }

    /// Append a random value in `0..PUSH_VALUE_BOUND` and return it.
    pub fn push<R: Rng>(&mut self, rng: &mut R) -> i32 {
        let value = rng.gen_range(0..PUSH_VALUE_BOUND);
        self.array_data.push(value);
        value
    }

    /// Remove the last element. Popping an empty array is a no-op.
    pub fn pop(&mut self) -> Option<i32> {
        self.array_data.pop()
    }
}

/// Read-only view of the parameters plus the playback flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub input_value: u8,
    pub loop_count: u64,
    pub array_data: Vec<i32>,
    pub is_playing: bool,
}

/// Group digits in threes, e.g. `1234567` → `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn input_value_is_clamped() {
        let mut p = ParamStore::new();
        p.set_input_value(150);
        assert_eq!(p.input_value(), 100);
        p.set_input_value(-3);
        assert_eq!(p.input_value(), 0);
        p.set_input_value(18);
        assert_eq!(p.input_value(), 18);
    }

    #[test]
    fn push_appends_value_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = ParamStore::new();
        for _ in 0..200 {
            let before = p.array_data().len();
            let v = p.push(&mut rng);
            assert_eq!(p.array_data().len(), before + 1);
            assert!((0..PUSH_VALUE_BOUND).contains(&v));
            assert_eq!(p.array_data().last(), Some(&v));
        }
    }

    #[test]
    fn pop_on_empty_is_noop() {
        let mut p = ParamStore::new();
        assert_eq!(p.pop(), Some(30));
        p.pop();
        p.pop();
        assert_eq!(p.pop(), None);
        assert!(p.array_data().is_empty());
    }

    #[test]
    fn bump_loop_saturates() {
        let mut p = ParamStore::new();
        p.set_loop(u64::MAX - 1);
        p.bump_loop(10);
        assert_eq!(p.loop_count(), u64::MAX);
        p.reset_loop();
        assert_eq!(p.loop_count(), 0);
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
