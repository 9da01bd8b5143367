//! Debounce state machine
//!
//! A raw label becomes the confirmed label only after it has been observed on
//! `K` consecutive cycles. Until then the previous confirmed label sticks, so
//! single-frame flicker never reaches the cooldown gate.

use gmc_common::Gesture;

#[derive(Debug, Clone)]
pub struct Stabilizer {
    threshold: u32,
    last_raw: Gesture,
    streak: u32,
    confirmed: Gesture,
}

impl Stabilizer {
    /// `confirmation_frames` is K; values below 1 are treated as 1.
    pub fn new(confirmation_frames: u32) -> Self {
        Self {
            threshold: confirmation_frames.max(1),
            last_raw: Gesture::None,
            streak: 0,
            confirmed: Gesture::None,
        }
    }

    /// Feed one cycle's fused label and return the confirmed label.
    pub fn observe(&mut self, raw: &Gesture) -> &Gesture {
        if *raw == self.last_raw {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.last_raw = raw.clone();
            self.streak = 1;
        }

        if self.streak >= self.threshold && self.confirmed != self.last_raw {
            self.confirmed = self.last_raw.clone();
        }

        &self.confirmed
    }

    pub fn confirmed(&self) -> &Gesture {
        &self.confirmed
    }

    pub fn last_raw(&self) -> &Gesture {
        &self.last_raw
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<Gesture> {
        names.iter().map(|n| Gesture::from_label(n)).collect()
    }

    fn run(k: u32, raw: &[Gesture]) -> Vec<Gesture> {
        let mut stabilizer = Stabilizer::new(k);
        raw.iter().map(|g| stabilizer.observe(g).clone()).collect()
    }

    #[test]
    fn test_initial_state() {
        let stabilizer = Stabilizer::new(8);
        assert_eq!(stabilizer.confirmed(), &Gesture::None);
        assert_eq!(stabilizer.streak(), 0);
        assert_eq!(stabilizer.threshold(), 8);
    }

    #[test]
    fn test_confirms_on_kth_consecutive_observation() {
        let raw = labels(&["fist", "fist", "palm", "palm", "palm", "palm"]);
        let confirmed = run(3, &raw);
        assert_eq!(confirmed, labels(&["none", "none", "none", "none", "palm", "palm"]));
    }

    #[test]
    fn test_flicker_is_ignored() {
        let raw = labels(&["palm", "palm", "palm", "fist", "palm", "fist", "fist"]);
        let confirmed = run(3, &raw);
        assert_eq!(confirmed, labels(&["none", "none", "palm", "palm", "palm", "palm", "palm"]));
    }

    #[test]
    fn test_returns_to_none_after_k_nones() {
        let raw = labels(&["palm", "palm", "none", "none", "none"]);
        let confirmed = run(2, &raw);
        assert_eq!(confirmed, labels(&["none", "palm", "palm", "none", "none"]));
    }

    #[test]
    fn test_streak_resets_on_change() {
        let mut stabilizer = Stabilizer::new(5);
        stabilizer.observe(&Gesture::FistMute);
        stabilizer.observe(&Gesture::FistMute);
        assert_eq!(stabilizer.streak(), 2);
        stabilizer.observe(&Gesture::PalmPausePlay);
        assert_eq!(stabilizer.streak(), 1);
        assert_eq!(stabilizer.last_raw(), &Gesture::PalmPausePlay);
    }

    #[test]
    fn test_k_of_one_confirms_immediately() {
        let raw = labels(&["fist", "palm"]);
        assert_eq!(run(1, &raw), labels(&["fist", "palm"]));
        assert_eq!(Stabilizer::new(0).threshold(), 1);
    }

    #[test]
    fn test_debounce_invariant_on_mixed_sequence() {
        // A confirmed change to L happens exactly when the last K raw labels all equal L
        let k = 4usize;
        let raw = labels(&[
            "palm", "fist", "fist", "fist", "fist", "palm", "fist", "palm", "palm", "palm", "palm",
            "none", "palm",
        ]);
        let confirmed = run(k as u32, &raw);
        let mut previous = Gesture::None;
        for (i, current) in confirmed.iter().enumerate() {
            if *current != previous {
                assert!(i + 1 >= k);
                assert!(raw[i + 1 - k..=i].iter().all(|g| g == current));
            }
            previous = current.clone();
        }
        assert_eq!(confirmed[4], Gesture::FistMute);
        assert_eq!(confirmed[10], Gesture::PalmPausePlay);
    }
}
