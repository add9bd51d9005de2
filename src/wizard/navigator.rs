//! Pure step-cursor state machine.
//!
//! The navigator knows nothing about inputs or rendering; callers run the
//! collect/validate gate and only then ask it to move forward.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Locked,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotState {
    Pending,
    Active,
    Done,
}

/// Progress indicators, fully determined by cursor and step count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub cursor: usize,
    pub total: usize,
    pub percent: u8,
    pub completed: bool,
}

impl Progress {
    pub fn at(cursor: usize, total: usize) -> Self {
        Self {
            cursor,
            total,
            percent: progress_percent(cursor, total),
            completed: false,
        }
    }

    pub fn complete(total: usize) -> Self {
        Self {
            cursor: total,
            total,
            percent: 100,
            completed: true,
        }
    }

    /// State of the 1-based position dot `position`.
    pub fn dot(&self, position: usize) -> DotState {
        if self.completed || position < self.cursor {
            DotState::Done
        } else if position == self.cursor {
            DotState::Active
        } else {
            DotState::Pending
        }
    }

    pub fn step_text(&self) -> String {
        format!("Paso {} de {}", self.cursor, self.total)
    }

    pub fn percent_text(&self) -> String {
        format!("{}% completado", self.percent)
    }
}

/// `round(((cursor - 1) / total) * 100)`.
pub fn progress_percent(cursor: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = cursor.saturating_sub(1) as f64 / total as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Moved { from: usize, to: usize },
    Stayed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    cursor: usize,
    total: usize,
    state: SubmissionState,
}

impl Navigator {
    /// `total` must be positive; the config builder guarantees it.
    pub(crate) fn new(total: usize) -> Self {
        Self {
            cursor: 1,
            total: total.max(1),
            state: SubmissionState::Idle,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_final_step(&self) -> bool {
        self.cursor == self.total
    }

    pub fn progress(&self) -> Progress {
        match self.state {
            SubmissionState::Done => Progress::complete(self.total),
            _ => Progress::at(self.cursor, self.total),
        }
    }

    /// Moves forward after a passing gate. Stays put on the final step.
    pub fn advance(&mut self) -> Move {
        if self.state != SubmissionState::Idle {
            return Move::Ignored;
        }
        if self.cursor < self.total {
            let from = self.cursor;
            self.cursor += 1;
            Move::Moved {
                from,
                to: self.cursor,
            }
        } else {
            Move::Stayed
        }
    }

    /// Moves back one step without any gate.
    pub fn retreat(&mut self) -> Move {
        if self.state != SubmissionState::Idle {
            return Move::Ignored;
        }
        if self.cursor > 1 {
            let from = self.cursor;
            self.cursor -= 1;
            Move::Moved {
                from,
                to: self.cursor,
            }
        } else {
            Move::Stayed
        }
    }

    /// Idle → Locked, only from the final step.
    pub fn lock(&mut self) -> bool {
        if self.state == SubmissionState::Idle && self.is_final_step() {
            self.state = SubmissionState::Locked;
            true
        } else {
            false
        }
    }

    /// Locked → Idle after a failed commit; the cursor stays on the final step.
    pub fn unlock(&mut self) -> bool {
        if self.state == SubmissionState::Locked {
            self.state = SubmissionState::Idle;
            true
        } else {
            false
        }
    }

    /// Locked → Done. Terminal.
    pub fn finish(&mut self) -> bool {
        if self.state == SubmissionState::Locked {
            self.state = SubmissionState::Done;
            true
        } else {
            false
        }
    }

    pub(crate) fn restart(&mut self) -> bool {
        if self.state == SubmissionState::Idle {
            self.cursor = 1;
            true
        } else {
            false
        }
    }
}
