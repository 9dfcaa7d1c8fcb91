//! World model and session state machine.
//!
//! The playfield is 84x48 with the origin top-left. The player's marker (a
//! vertical bar) and launcher (a horizontal bar) move together in Y; shots
//! leave the launcher tip and travel right until they hit the target's box
//! or leave the screen, which ends the session on the spot.

use crate::clock::GameClock;
use crate::input::Buttons;
use crate::rng::Rng;

// --- Playfield ---
pub const SCREEN_W: i32 = 84;
pub const SCREEN_H: i32 = 48;
pub const X_MAX: i32 = SCREEN_W - 1;
pub const Y_MAX: i32 = SCREEN_H - 1;

// --- Entities ---
pub const MARKER_X: i32 = 10;
pub const MARKER_HALF: i32 = 3;
pub const LAUNCHER_HALF: i32 = 5;
pub const TARGET_SIZE: i32 = 3;
pub const MAX_SHOTS: usize = 5;
const MOVE_STEP: i32 = 2;
const SHOT_SPEED: i32 = 2;

// --- Session bounds ---
pub const WIN_SCORE: u32 = 10;
pub const TIME_LIMIT_MS: u32 = 10_000;
/// End-screen hold: 2000 ms at the 50 ms frame period.
pub const HOLD_FRAMES: u32 = 40;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Phase {
    Intro,
    Playing,
    GameOver,
    Victory,
}

/// What a frame step did, for the firmware's log and LED.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Transition {
    None,
    Started,
    Lost,
    Won,
    BackToIntro,
}

#[derive(Clone, Copy)]
pub struct Shot {
    pub x: i32,
    pub y: i32,
    pub active: bool,
}

impl Shot {
    const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            active: false,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Target {
    pub x: i32,
    pub y: i32,
    pub active: bool,
}

/// Inclusive box test: the target's hit box is one wider than its 3x3
/// sprite on both axes, and the marker/launcher boxes extend half-length
/// in every direction. Both quirks are part of the game's contract.
fn in_box(x: i32, y: i32, cx: i32, cy: i32, half: i32) -> bool {
    x >= cx - half && x <= cx + half && y >= cy - half && y <= cy + half
}

fn hits_target(x: i32, y: i32, t: &Target) -> bool {
    x >= t.x && x <= t.x + TARGET_SIZE && y >= t.y && y <= t.y + TARGET_SIZE
}

pub struct World {
    pub marker_x: i32,
    pub marker_y: i32,
    pub launcher_x: i32,
    pub launcher_y: i32,
    pub score: u32,
    pub target: Target,
    shots: [Shot; MAX_SHOTS],
    prev_fire: bool,
}

impl World {
    pub fn new() -> Self {
        Self {
            marker_x: MARKER_X,
            marker_y: SCREEN_H / 2,
            launcher_x: MARKER_X,
            launcher_y: SCREEN_H / 2,
            score: 0,
            target: Target {
                x: 0,
                y: 0,
                active: false,
            },
            shots: [Shot::new(); MAX_SHOTS],
            prev_fire: false,
        }
    }

    pub fn shots(&self) -> &[Shot; MAX_SHOTS] {
        &self.shots
    }

    /// Marker and launcher move together. Both directions apply
    /// independently, so holding both buttons yields zero net motion.
    /// That is the policy, not an oversight.
    pub fn move_marker(&mut self, buttons: Buttons) {
        if buttons.up {
            self.marker_y -= MOVE_STEP;
            self.launcher_y -= MOVE_STEP;
        }
        if buttons.down {
            self.marker_y += MOVE_STEP;
            self.launcher_y += MOVE_STEP;
        }
    }

    /// Fires on the release edge: pressed last frame, not pressed now.
    /// At most one slot activates per edge; with no free slot the request
    /// is dropped, never queued.
    pub fn fire(&mut self, buttons: Buttons) {
        if self.prev_fire && !buttons.fire {
            for shot in self.shots.iter_mut() {
                if !shot.active {
                    shot.x = self.launcher_x + LAUNCHER_HALF;
                    shot.y = self.launcher_y;
                    shot.active = true;
                    break;
                }
            }
        }
        self.prev_fire = buttons.fire;
    }

    /// Moves every active shot right. Returns true the moment any shot
    /// leaves the screen; the caller must end the session immediately.
    /// A shot landing in the target box scores and relocates the target.
    pub fn advance_shots(&mut self, rng: &mut Rng) -> bool {
        for i in 0..MAX_SHOTS {
            if !self.shots[i].active {
                continue;
            }
            self.shots[i].x += SHOT_SPEED;
            let (x, y) = (self.shots[i].x, self.shots[i].y);
            if x >= X_MAX || y <= 0 || y >= Y_MAX {
                return true;
            }
            if self.target.active && hits_target(x, y, &self.target) {
                self.shots[i].active = false;
                self.score += 1;
                self.relocate_target(rng);
            }
        }
        false
    }

    /// Second look at the same conditions `advance_shots` already checked:
    /// every active shot against the target box, then the target against
    /// the screen edges and the player's two bars. The double check is the
    /// observed contract of the game, so it stays.
    pub fn collision_sweep(&mut self, rng: &mut Rng) {
        for i in 0..MAX_SHOTS {
            let (x, y) = (self.shots[i].x, self.shots[i].y);
            if self.shots[i].active && self.target.active && hits_target(x, y, &self.target) {
                self.shots[i].active = false;
                self.score += 1;
                self.relocate_target(rng);
            }
        }

        let t = self.target;
        if t.active
            && (t.x <= 0
                || t.x >= X_MAX
                || t.y <= 0
                || t.y >= Y_MAX
                || in_box(t.x, t.y, self.marker_x, self.marker_y, MARKER_HALF)
                || in_box(t.x, t.y, self.launcher_x, self.launcher_y, LAUNCHER_HALF))
        {
            self.relocate_target(rng);
        }
    }

    /// Rejection-samples a fresh target position. Anything touching the
    /// launcher or marker boxes, or in the upper or left half of the
    /// screen, is resampled: the target always lands in the lower-right
    /// quadrant, away from the player. Intentional bias.
    pub fn relocate_target(&mut self, rng: &mut Rng) {
        loop {
            let x = 5 + rng.range(X_MAX - TARGET_SIZE - 5);
            let y = 5 + rng.range(Y_MAX - TARGET_SIZE - 5);
            if in_box(x, y, self.launcher_x, self.launcher_y, LAUNCHER_HALF)
                || in_box(x, y, self.marker_x, self.marker_y, MARKER_HALF)
                || y <= Y_MAX / 2
                || x <= X_MAX / 2
            {
                continue;
            }
            self.target = Target { x, y, active: true };
            return;
        }
    }

    /// Session reset: score gone, shots gone, fresh target. The marker's
    /// position survives between sessions.
    pub fn reset_session(&mut self, rng: &mut Rng) {
        self.score = 0;
        for shot in self.shots.iter_mut() {
            shot.active = false;
        }
        self.relocate_target(rng);
    }

    #[cfg(test)]
    fn spawn_shot(&mut self, x: i32, y: i32) {
        for shot in self.shots.iter_mut() {
            if !shot.active {
                shot.x = x;
                shot.y = y;
                shot.active = true;
                return;
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Game {
    pub phase: Phase,
    pub world: World,
    hold: u32,
}

impl Game {
    pub fn new(rng: &mut Rng) -> Self {
        let mut world = World::new();
        world.relocate_target(rng);
        Self {
            phase: Phase::Intro,
            world,
            hold: 0,
        }
    }

    /// One 50 ms frame of the session state machine.
    ///
    /// Intro leaves for Playing when fire is sampled pressed (level, not
    /// edge). Playing checks the session bounds before touching the world,
    /// so a frame that ends the session performs no gameplay update.
    /// Firing comes after the advance, so a fresh shot spends its first
    /// drawn frame at the launcher tip. The two end screens hold for
    /// `HOLD_FRAMES`, then zero the clock and fall back to Intro.
    pub fn step(&mut self, buttons: Buttons, clock: &GameClock, rng: &mut Rng) -> Transition {
        match self.phase {
            Phase::Intro => {
                if buttons.fire {
                    self.phase = Phase::Playing;
                    Transition::Started
                } else {
                    Transition::None
                }
            }
            Phase::Playing => {
                if clock.elapsed_ms() >= TIME_LIMIT_MS {
                    self.end_session(Phase::GameOver, rng);
                    Transition::Lost
                } else if self.world.score >= WIN_SCORE {
                    self.end_session(Phase::Victory, rng);
                    Transition::Won
                } else {
                    self.world.move_marker(buttons);
                    if self.world.advance_shots(rng) {
                        // A shot left the screen: the session ends right
                        // here, bypassing the next frame's bound check.
                        self.end_session(Phase::GameOver, rng);
                        return Transition::Lost;
                    }
                    self.world.collision_sweep(rng);
                    self.world.fire(buttons);
                    Transition::None
                }
            }
            Phase::GameOver | Phase::Victory => {
                if self.hold > 0 {
                    self.hold -= 1;
                    Transition::None
                } else {
                    // The clock keeps ticking through the end screen; its
                    // holdover is wiped here, so only time idled on the
                    // intro screen counts against the next session.
                    clock.reset();
                    self.phase = Phase::Intro;
                    Transition::BackToIntro
                }
            }
        }
    }

    fn end_session(&mut self, terminal: Phase, rng: &mut Rng) {
        self.phase = terminal;
        self.hold = HOLD_FRAMES;
        self.world.reset_session(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TICK_MS;

    fn rng() -> Rng {
        Rng::new(0xC0FF_EE11)
    }

    fn fire_released() -> (Buttons, Buttons) {
        (
            Buttons {
                fire: true,
                ..Buttons::default()
            },
            Buttons::default(),
        )
    }

    fn playing_game(rng: &mut Rng) -> (Game, GameClock) {
        let mut game = Game::new(rng);
        let clock = GameClock::new();
        let (pressed, _) = fire_released();
        assert_eq!(game.step(pressed, &clock, rng), Transition::Started);
        (game, clock)
    }

    #[test]
    fn release_edge_fires_exactly_one_shot() {
        let mut world = World::new();
        let (pressed, released) = fire_released();
        world.fire(pressed);
        assert_eq!(world.shots().iter().filter(|s| s.active).count(), 0);
        world.fire(released);
        assert_eq!(world.shots().iter().filter(|s| s.active).count(), 1);
        let shot = world.shots()[0];
        assert_eq!((shot.x, shot.y), (MARKER_X + LAUNCHER_HALF, SCREEN_H / 2));
    }

    #[test]
    fn holding_fire_does_not_fire() {
        let mut world = World::new();
        let (pressed, _) = fire_released();
        for _ in 0..10 {
            world.fire(pressed);
        }
        assert!(world.shots().iter().all(|s| !s.active));
    }

    #[test]
    fn fire_with_full_slots_is_dropped() {
        let mut world = World::new();
        let (pressed, released) = fire_released();
        for _ in 0..MAX_SHOTS {
            world.fire(pressed);
            world.fire(released);
        }
        assert!(world.shots().iter().all(|s| s.active));
        world.fire(pressed);
        world.fire(released);
        // Still exactly MAX_SHOTS, nothing queued or overwritten.
        assert_eq!(world.shots().iter().filter(|s| s.active).count(), MAX_SHOTS);
    }

    #[test]
    fn opposing_buttons_cancel_out() {
        let mut world = World::new();
        let y0 = world.marker_y;
        world.move_marker(Buttons {
            up: true,
            down: true,
            fire: false,
        });
        assert_eq!(world.marker_y, y0);
        assert_eq!(world.launcher_y, y0);
    }

    #[test]
    fn marker_and_launcher_move_together() {
        let mut world = World::new();
        world.move_marker(Buttons {
            up: true,
            ..Buttons::default()
        });
        assert_eq!(world.marker_y, SCREEN_H / 2 - 2);
        assert_eq!(world.launcher_y, SCREEN_H / 2 - 2);
        world.move_marker(Buttons {
            down: true,
            ..Buttons::default()
        });
        assert_eq!(world.marker_y, SCREEN_H / 2);
        assert_eq!(world.launcher_y, SCREEN_H / 2);
    }

    #[test]
    fn advance_scores_and_relocates_on_hit() {
        let mut rng = rng();
        let mut world = World::new();
        world.target = Target {
            x: 50,
            y: 30,
            active: true,
        };
        // After +2 the shot sits on the inclusive right edge of the box.
        world.spawn_shot(51, 33);
        assert!(!world.advance_shots(&mut rng));
        assert_eq!(world.score, 1);
        assert!(!world.shots()[0].active);
        // A fresh target was accepted in the lower-right quadrant.
        assert!(world.target.active);
        assert!(world.target.x > X_MAX / 2 && world.target.y > Y_MAX / 2);
    }

    #[test]
    fn advance_out_of_bounds_reports_game_over() {
        let mut rng = rng();
        let mut world = World::new();
        world.spawn_shot(82, 24);
        assert!(world.advance_shots(&mut rng));
    }

    #[test]
    fn sweep_scores_without_an_advance() {
        let mut rng = rng();
        let mut world = World::new();
        world.target = Target {
            x: 50,
            y: 30,
            active: true,
        };
        world.spawn_shot(52, 31);
        world.collision_sweep(&mut rng);
        assert_eq!(world.score, 1);
        assert!(!world.shots()[0].active);
    }

    #[test]
    fn sweep_relocates_target_overlapping_launcher() {
        let mut rng = rng();
        let mut world = World::new();
        world.target = Target {
            x: world.launcher_x + LAUNCHER_HALF,
            y: world.launcher_y,
            active: true,
        };
        world.collision_sweep(&mut rng);
        let t = world.target;
        assert!(!in_box(t.x, t.y, world.launcher_x, world.launcher_y, LAUNCHER_HALF));
    }

    #[test]
    fn relocation_respects_quadrant_and_boxes() {
        let mut rng = rng();
        let mut world = World::new();
        for _ in 0..500 {
            world.relocate_target(&mut rng);
            let t = world.target;
            assert!(t.active);
            assert!(t.x > X_MAX / 2 && t.y > Y_MAX / 2);
            assert!(t.x >= 5 && t.x < X_MAX - TARGET_SIZE);
            assert!(t.y >= 5 && t.y < Y_MAX - TARGET_SIZE);
            // With the launcher at (10, 24): nothing inside its +-5 box.
            assert!(!(t.x >= 5 && t.x <= 15 && t.y >= 19 && t.y <= 29));
        }
    }

    #[test]
    fn intro_starts_on_fire_level() {
        let mut rng = rng();
        let mut game = Game::new(&mut rng);
        let clock = GameClock::new();
        assert_eq!(
            game.step(Buttons::default(), &clock, &mut rng),
            Transition::None
        );
        assert_eq!(game.phase, Phase::Intro);
        let (pressed, _) = fire_released();
        assert_eq!(game.step(pressed, &clock, &mut rng), Transition::Started);
        assert_eq!(game.phase, Phase::Playing);
    }

    #[test]
    fn time_limit_ends_session_and_clears_state() {
        let mut rng = rng();
        let (mut game, clock) = playing_game(&mut rng);
        game.world.score = 3;
        for _ in 0..(TIME_LIMIT_MS / TICK_MS) {
            clock.tick();
        }
        assert_eq!(
            game.step(Buttons::default(), &clock, &mut rng),
            Transition::Lost
        );
        assert_eq!(game.phase, Phase::GameOver);
        assert_eq!(game.world.score, 0);
        // The clock is only zeroed once the end screen expires.
        assert_eq!(clock.elapsed_ms(), TIME_LIMIT_MS);
        for _ in 0..=HOLD_FRAMES {
            game.step(Buttons::default(), &clock, &mut rng);
        }
        assert_eq!(game.phase, Phase::Intro);
        assert_eq!(clock.elapsed_ms(), 0);
    }

    #[test]
    fn ten_hits_win_before_the_clock() {
        let mut rng = rng();
        let (mut game, clock) = playing_game(&mut rng);
        clock.tick(); // 100 ms elapsed, nowhere near the limit
        game.world.score = WIN_SCORE;
        assert_eq!(
            game.step(Buttons::default(), &clock, &mut rng),
            Transition::Won
        );
        assert_eq!(game.phase, Phase::Victory);
        assert_eq!(game.world.score, 0);
        assert_eq!(clock.elapsed_ms(), 100);
    }

    #[test]
    fn bound_checks_precede_gameplay_updates() {
        let mut rng = rng();
        let (mut game, clock) = playing_game(&mut rng);
        game.world.spawn_shot(40, 24);
        for _ in 0..(TIME_LIMIT_MS / TICK_MS) {
            clock.tick();
        }
        // Score at the win bound too: the time check still wins.
        game.world.score = WIN_SCORE;
        assert_eq!(
            game.step(Buttons::default(), &clock, &mut rng),
            Transition::Lost
        );
        // reset_session deactivated the shot without ever advancing it.
        assert!(game.world.shots().iter().all(|s| !s.active));
    }

    #[test]
    fn out_of_bounds_shot_ends_session_within_the_frame() {
        let mut rng = rng();
        let (mut game, clock) = playing_game(&mut rng);
        game.world.spawn_shot(82, 24);
        clock.tick();
        assert_eq!(
            game.step(Buttons::default(), &clock, &mut rng),
            Transition::Lost
        );
        assert_eq!(game.phase, Phase::GameOver);
        assert_eq!(game.world.score, 0);
        assert_eq!(clock.elapsed_ms(), 100);
    }

    #[test]
    fn end_screen_holds_then_returns_to_intro() {
        let mut rng = rng();
        let (mut game, clock) = playing_game(&mut rng);
        game.world.spawn_shot(82, 24);
        game.step(Buttons::default(), &clock, &mut rng);
        for _ in 0..HOLD_FRAMES {
            assert_eq!(
                game.step(Buttons::default(), &clock, &mut rng),
                Transition::None
            );
            assert_eq!(game.phase, Phase::GameOver);
        }
        assert_eq!(
            game.step(Buttons::default(), &clock, &mut rng),
            Transition::BackToIntro
        );
        assert_eq!(game.phase, Phase::Intro);
    }

    #[test]
    fn end_screen_ticks_do_not_leak_into_next_session() {
        let mut rng = rng();
        let (mut game, clock) = playing_game(&mut rng);
        game.world.spawn_shot(82, 24);
        assert_eq!(
            game.step(Buttons::default(), &clock, &mut rng),
            Transition::Lost
        );
        // The clock keeps running for the 2 s the end screen is shown.
        for _ in 0..HOLD_FRAMES {
            clock.tick();
            game.step(Buttons::default(), &clock, &mut rng);
        }
        assert_eq!(
            game.step(Buttons::default(), &clock, &mut rng),
            Transition::BackToIntro
        );
        assert_eq!(clock.elapsed_ms(), 0);
        let (pressed, _) = fire_released();
        assert_eq!(game.step(pressed, &clock, &mut rng), Transition::Started);
        assert_eq!(clock.elapsed_ms(), 0);
    }

    #[test]
    fn new_shot_first_appears_at_the_launcher_tip() {
        let mut rng = rng();
        let (mut game, clock) = playing_game(&mut rng);
        let (pressed, released) = fire_released();
        game.step(pressed, &clock, &mut rng);
        game.step(released, &clock, &mut rng);
        let shot = game.world.shots()[0];
        assert!(shot.active);
        // Not advanced in its firing frame, so the frame is drawn with the
        // shot still at the tip.
        assert_eq!((shot.x, shot.y), (MARKER_X + LAUNCHER_HALF, SCREEN_H / 2));
        game.step(Buttons::default(), &clock, &mut rng);
        assert_eq!(game.world.shots()[0].x, MARKER_X + LAUNCHER_HALF + 2);
    }
}
