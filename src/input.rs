//! Per-frame button snapshot.
//!
//! The three lines are active-low momentary buttons; the firmware samples
//! them once per 50 ms frame (the frame period is all the debouncing this
//! game needs) and hands the game a plain snapshot of "pressed" levels.

#[derive(Clone, Copy, Default)]
pub struct Buttons {
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

impl Buttons {
    /// True if any line is pressed this frame. Used to seed the PRNG from
    /// the timer at the first sign of a human.
    pub fn any(&self) -> bool {
        self.up || self.down || self.fire
    }
}
