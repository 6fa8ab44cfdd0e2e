//! Continuous-force guard: repeats forced movement while the agent stays stuck.

/// Elapsed-time gate around repeated forced moves.
///
/// A repeat is allowed only while stuck, within `cooldown` seconds of the
/// previous forced move, and while fewer than `max_repeats` repeats were
/// issued. The repeat count resets once `reset_after` seconds pass without
/// any forced move.
#[derive(Clone, Debug)]
pub struct ForceGuard {
    cooldown: f32,
    max_repeats: u32,
    reset_after: f32,
    last_forced_at: Option<f32>,
    repeats: u32,
}

impl ForceGuard {
    pub fn new(cooldown: f32, max_repeats: u32, reset_after: f32) -> Self {
        Self {
            cooldown,
            max_repeats,
            reset_after,
            last_forced_at: None,
            repeats: 0,
        }
    }

    /// Notes a forced move issued for any reason.
    pub fn note_forced(&mut self, now: f32) {
        if self
            .last_forced_at
            .is_some_and(|last| now - last >= self.reset_after)
        {
            self.repeats = 0;
        }
        self.last_forced_at = Some(now);
    }

    /// Whether another forced move should be issued now. Counts the repeat
    /// when it returns true; the caller still reports the move through
    /// [`ForceGuard::note_forced`].
    pub fn should_repeat(&mut self, now: f32, is_stuck: bool) -> bool {
        let Some(last) = self.last_forced_at else {
            return false;
        };
        let since = now - last;
        if since >= self.reset_after {
            self.repeats = 0;
        }
        if !is_stuck || since > self.cooldown || self.repeats >= self.max_repeats {
            return false;
        }
        self.repeats += 1;
        true
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    pub fn last_forced_at(&self) -> Option<f32> {
        self.last_forced_at
    }
}
