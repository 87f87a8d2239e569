use std::cell::Cell;
use std::rc::Rc;

/// Stoppable condition guarding the frame loop.
///
/// Clones share one flag. Hosts check `is_running` before scheduling the
/// next tick; anything holding a clone can stop the loop.
#[derive(Debug, Clone)]
pub struct LoopControl {
    running: Rc<Cell<bool>>,
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopControl {
    pub fn new() -> Self {
        Self {
            running: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&self) {
        if self.running.replace(false) {
            log::info!("Frame loop stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let control = LoopControl::new();
        let other = control.clone();
        assert!(control.is_running());
        other.stop();
        assert!(!control.is_running());
        control.stop();
        assert!(!other.is_running());
    }
}
