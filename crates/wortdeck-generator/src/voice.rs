use std::sync::atomic::{AtomicUsize, Ordering};

use rand::seq::SliceRandom;

/// Voice selection policy, one pick per speech request. Injectable so tests
/// can fix the voice deterministically.
pub trait VoiceSelector: Send + Sync {
    fn pick<'a>(&self, voices: &'a [String]) -> Option<&'a str>;
}

/// Uniform random pick, varies audio character across requests
pub struct RandomVoice;

impl VoiceSelector for RandomVoice {
    fn pick<'a>(&self, voices: &'a [String]) -> Option<&'a str> {
        voices.choose(&mut rand::thread_rng()).map(String::as_str)
    }
}

pub struct RoundRobinVoice {
    next: AtomicUsize,
}

impl RoundRobinVoice {
    pub fn new() -> Self {
        Self { next: AtomicUsize::new(0) }
    }
}

impl Default for RoundRobinVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceSelector for RoundRobinVoice {
    fn pick<'a>(&self, voices: &'a [String]) -> Option<&'a str> {
        if voices.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % voices.len();
        Some(voices[index].as_str())
    }
}

/// Always the same voice
pub struct FixedVoice(pub usize);

impl VoiceSelector for FixedVoice {
    fn pick<'a>(&self, voices: &'a [String]) -> Option<&'a str> {
        voices.get(self.0).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<String> {
        ["alloy", "echo", "fable"].map(String::from).to_vec()
    }

    #[test]
    fn round_robin_cycles_through_voices() {
        let selector = RoundRobinVoice::new();
        let voices = voices();

        let picks: Vec<_> = (0..6).map(|_| selector.pick(&voices).unwrap()).collect();
        assert_eq!(picks, ["alloy", "echo", "fable", "alloy", "echo", "fable"]);
    }

    #[test]
    fn fixed_voice_is_deterministic() {
        let selector = FixedVoice(1);
        let voices = voices();

        assert_eq!(selector.pick(&voices), Some("echo"));
        assert_eq!(selector.pick(&voices), Some("echo"));
    }

    #[test]
    fn random_pick_is_a_member_of_the_set() {
        let selector = RandomVoice;
        let voices = voices();

        for _ in 0..20 {
            let pick = selector.pick(&voices).unwrap();
            assert!(voices.iter().any(|v| v == pick));
        }
    }

    #[test]
    fn empty_voice_set_yields_none() {
        assert!(RandomVoice.pick(&[]).is_none());
        assert!(RoundRobinVoice::new().pick(&[]).is_none());
        assert!(FixedVoice(0).pick(&[]).is_none());
    }
}
