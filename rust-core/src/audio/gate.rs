//! Speech-activity gate with hysteresis
//!
//! Works per segment rather than per sample: each segment's level in dB
//! either opens the gate, keeps it open, or closes it. State carries over
//! between segments and batches.

/// Gap between the opening and closing thresholds in dB
pub const HYSTERESIS_DB: f32 = 3.0;

/// Segment-level speech gate
#[derive(Debug, Clone)]
pub struct SpeechGate {
    /// Level in dB at which the gate opens
    threshold_db: f32,

    /// Whether the gate is currently open
    is_open: bool,
}

impl SpeechGate {
    /// Create a closed gate
    ///
    /// # Arguments
    /// * `threshold_db` - Opening threshold in dB (e.g., -35.0)
    pub fn new(threshold_db: f32) -> Self {
        Self {
            threshold_db,
            is_open: false,
        }
    }

    /// Feed one segment level and return whether speech is active
    pub fn update(&mut self, level_db: f32) -> bool {
        if self.is_open {
            if level_db < self.threshold_db - HYSTERESIS_DB {
                self.is_open = false;
            }
        } else if level_db >= self.threshold_db {
            self.is_open = true;
        }
        self.is_open
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_opens_above_threshold() {
        let mut gate = SpeechGate::new(-35.0);
        assert!(!gate.update(-60.0));
        assert!(gate.update(-20.0));
    }

    #[test]
    fn test_gate_hysteresis() {
        let mut gate = SpeechGate::new(-35.0);
        assert!(gate.update(-35.0));

        // Slightly below threshold keeps it open
        assert!(gate.update(-37.0));

        // Below threshold minus hysteresis closes it
        assert!(!gate.update(-38.5));

        // Reopening needs the full threshold again
        assert!(!gate.update(-36.0));
        assert!(gate.update(-34.0));
    }

    #[test]
    fn test_closes_below_hysteresis_band() {
        let mut gate = SpeechGate::new(-35.0);
        gate.update(0.0);
        assert!(gate.is_open());
        assert!(!gate.update(-38.5));
        assert!(!gate.is_open());
    }
}
