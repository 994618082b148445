use crate::types::round::RoundSpec;
use crate::types::timer::TimerEngine;
use tracing::info;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SequencerError {
    #[error("round index {0} is out of range")]
    IndexOutOfRange(usize),
}

/// Tracks which configured round is selected and feeds the chosen round into
/// the timer engine. Selection alone is a preview; only `start_round` touches
/// the engine.
pub struct RoundSequencer {
    rounds: Vec<RoundSpec>,
    current_index: Option<usize>,
}

impl RoundSequencer {
    pub fn new() -> Self {
        RoundSequencer {
            rounds: Vec::new(),
            current_index: None,
        }
    }

    /// Store a freshly loaded round list and forget any prior selection.
    pub fn load(&mut self, rounds: Vec<RoundSpec>) {
        info!(count = rounds.len(), "round list loaded");
        self.rounds = rounds;
        self.current_index = None;
    }

    pub fn rounds(&self) -> &[RoundSpec] {
        &self.rounds
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&RoundSpec> {
        self.current_index.and_then(|i| self.rounds.get(i))
    }

    /// Select a round for preview without starting any timer.
    pub fn select(&mut self, index: usize) -> Result<(), SequencerError> {
        if index >= self.rounds.len() {
            return Err(SequencerError::IndexOutOfRange(index));
        }
        self.current_index = Some(index);
        Ok(())
    }

    /// Make `index` the active round and push it into the engine. Overwrites
    /// a round already mid-countdown without a guard.
    pub fn start_round(
        &mut self,
        index: usize,
        engine: &mut TimerEngine,
    ) -> Result<&RoundSpec, SequencerError> {
        if index >= self.rounds.len() {
            return Err(SequencerError::IndexOutOfRange(index));
        }
        info!(index, "round started");
        self.current_index = Some(index);
        engine.set_round(self.rounds[index].clone());
        Ok(&self.rounds[index])
    }

    /// Move the selection forward by one. Returns false (and leaves the
    /// selection alone) at the end of the list or before anything is
    /// selected.
    pub fn advance(&mut self) -> bool {
        match self.current_index {
            Some(i) if i + 1 < self.rounds.len() => {
                self.current_index = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    /// Move the selection back by one, bounded at the first round.
    pub fn retreat(&mut self) -> bool {
        match self.current_index {
            Some(i) if i > 0 => {
                self.current_index = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Terminate the engine and report which round the display should
    /// preview next: the one after the current round, clamped to the last
    /// valid index. The selection itself does not move until the moderator
    /// explicitly starts the next round.
    pub fn terminate_and_advance(&mut self, engine: &mut TimerEngine) -> Option<usize> {
        engine.terminate();
        if self.rounds.is_empty() {
            return None;
        }
        let last = self.rounds.len() - 1;
        let preview = match self.current_index {
            Some(i) => (i + 1).min(last),
            None => 0,
        };
        Some(preview)
    }

    /// The round after the current one, feeding the "next up" display.
    pub fn peek_next(&self) -> Option<&RoundSpec> {
        let next = match self.current_index {
            Some(i) => i + 1,
            None => 0,
        };
        self.rounds.get(next)
    }
}

impl Default for RoundSequencer {
    fn default() -> Self {
        Self::new()
    }
}
