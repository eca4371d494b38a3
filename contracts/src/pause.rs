//! Pause switch.
//!
//! A single flag. While it is set, every balance mutation and every
//! administrative call except `unpause` is rejected at the operation
//! boundary.

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Whether operations are halted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseState {
    paused: bool,
}

impl PauseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fails with [`TokenError::Paused`] while halted.
    pub fn ensure_not_paused(&self) -> Result<(), TokenError> {
        if self.paused {
            return Err(TokenError::Paused);
        }
        Ok(())
    }

    /// Fails with [`TokenError::NotPaused`] while running.
    pub fn ensure_paused(&self) -> Result<(), TokenError> {
        if !self.paused {
            return Err(TokenError::NotPaused);
        }
        Ok(())
    }

    /// `Active -> Paused`.
    pub(crate) fn pause(&mut self) -> Result<(), TokenError> {
        self.ensure_not_paused()?;
        self.paused = true;
        Ok(())
    }

    /// `Paused -> Active`.
    pub(crate) fn unpause(&mut self) -> Result<(), TokenError> {
        self.ensure_paused()?;
        self.paused = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_active() {
        let state = PauseState::new();
        assert!(!state.is_paused());
        assert!(state.ensure_not_paused().is_ok());
        assert_eq!(state.ensure_paused(), Err(TokenError::NotPaused));
    }

    #[test]
    fn toggles_between_states() {
        let mut state = PauseState::new();
        state.pause().unwrap();
        assert!(state.is_paused());
        assert_eq!(state.ensure_not_paused(), Err(TokenError::Paused));
        state.unpause().unwrap();
        assert!(!state.is_paused());
    }

    #[test]
    fn double_transitions_rejected() {
        let mut state = PauseState::new();
        assert_eq!(state.unpause(), Err(TokenError::NotPaused));
        state.pause().unwrap();
        assert_eq!(state.pause(), Err(TokenError::Paused));
    }
}
