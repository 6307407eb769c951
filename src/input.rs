/// Drag displacement needed to commit an answer
pub const SWIPE_THRESHOLD: f64 = 100.0;
/// Displacement at which the card starts hinting at the pending answer
pub const SWIPE_HINT: f64 = 50.0;

/// Raw input from any of the three channels. Positions are horizontal only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyLeft,
    KeyRight,
    PointerDown(f64),
    PointerMove(f64),
    PointerUp,
    PointerLeave,
    TouchStart(f64),
    TouchMove(f64),
    TouchEnd,
}

/// What the current drag would answer if released now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeHint {
    Correct,
    Incorrect,
}

/// Turns keys and drags into a single "the shown spelling is correct" claim
#[derive(Debug, Clone, PartialEq)]
pub struct GestureController {
    drag_start: Option<f64>,
    offset: f64,
    threshold: f64,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}

impl GestureController {
    pub fn new(threshold: f64) -> Self {
        Self {
            drag_start: None,
            offset: 0.0,
            threshold,
        }
    }

    /// Feed one event. Returns the user's claim when an answer is committed.
    /// Everything is ignored while `locked`.
    pub fn handle(&mut self, event: InputEvent, locked: bool) -> Option<bool> {
        if locked {
            return None;
        }

        match event {
            InputEvent::KeyLeft => Some(true),
            InputEvent::KeyRight => Some(false),
            InputEvent::PointerDown(x) | InputEvent::TouchStart(x) => {
                self.drag_start = Some(x);
                None
            }
            InputEvent::PointerMove(x) | InputEvent::TouchMove(x) => {
                if let Some(start) = self.drag_start {
                    self.offset = x - start;
                }
                None
            }
            InputEvent::PointerUp | InputEvent::PointerLeave | InputEvent::TouchEnd => {
                self.release()
            }
        }
    }

    fn release(&mut self) -> Option<bool> {
        self.drag_start.take()?;

        let claim = if self.offset < -self.threshold {
            Some(true)
        } else if self.offset > self.threshold {
            Some(false)
        } else {
            None
        };
        self.offset = 0.0;
        claim
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    pub fn hint(&self) -> Option<SwipeHint> {
        if self.offset < -SWIPE_HINT {
            Some(SwipeHint::Correct)
        } else if self.offset > SWIPE_HINT {
            Some(SwipeHint::Incorrect)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.drag_start = None;
        self.offset = 0.0;
    }
}
