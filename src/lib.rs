//! Game logic for "Shoot a Thing", a reaction shooter on an 84x48
//! monochrome playfield.
//!
//! Everything in this library is platform-independent: the firmware binary
//! samples buttons and owns the physical display, while the modules here hold
//! the world model, the session state machine, the shared elapsed-time
//! counter, and the scene rendering (generic over any
//! `DrawTarget<Color = BinaryColor>`). That split keeps the whole game
//! testable on the host.

#![no_std]

pub mod clock;
pub mod draw;
pub mod game;
pub mod input;
pub mod rng;

pub use clock::{GameClock, TICK_MS};
pub use game::{Game, Phase, Transition, World};
pub use input::Buttons;
pub use rng::Rng;
