//! Scene rendering, generic over any monochrome `DrawTarget`.
//!
//! Coordinates here are the 84x48 playfield; the firmware hands in a
//! translated view of the physical display so the game never learns where
//! the playfield sits on the panel. Draw errors propagate to the caller.

use core::fmt::Write as _;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_6X10};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::game::{LAUNCHER_HALF, MARKER_HALF, TARGET_SIZE, World};

fn message_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_6X10, BinaryColor::On)
}

fn hud_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_4X6, BinaryColor::On)
}

pub fn intro<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline("SHOOT A THING", Point::new(1, 1), message_style(), Baseline::Top)
        .draw(target)?;
    Text::with_baseline("PRESS SHOOT", Point::new(1, 13), message_style(), Baseline::Top)
        .draw(target)?;
    Ok(())
}

pub fn game_over<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline("GAME OVER", Point::new(15, 19), message_style(), Baseline::Top)
        .draw(target)?;
    Ok(())
}

pub fn victory<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline("YOU WIN!", Point::new(18, 19), message_style(), Baseline::Top)
        .draw(target)?;
    Ok(())
}

/// Marker and launcher bars, the 3x3 target square, one pixel per active
/// shot, and the two HUD lines (elapsed time top, score bottom).
pub fn playing<D>(target: &mut D, world: &World, elapsed_ms: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    Line::new(
        Point::new(world.marker_x, world.marker_y - MARKER_HALF),
        Point::new(world.marker_x, world.marker_y + MARKER_HALF),
    )
    .into_styled(stroke)
    .draw(target)?;

    Line::new(
        Point::new(world.launcher_x - LAUNCHER_HALF, world.launcher_y),
        Point::new(world.launcher_x + LAUNCHER_HALF, world.launcher_y),
    )
    .into_styled(stroke)
    .draw(target)?;

    if world.target.active {
        Rectangle::new(
            Point::new(world.target.x, world.target.y),
            Size::new(TARGET_SIZE as u32, TARGET_SIZE as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;
    }

    for shot in world.shots() {
        if shot.active {
            Pixel(Point::new(shot.x, shot.y), BinaryColor::On).draw(target)?;
        }
    }

    let mut buf = heapless::String::<16>::new();
    core::write!(buf, "Time:{}", elapsed_ms).ok();
    Text::with_baseline(&buf, Point::new(1, 1), hud_style(), Baseline::Top).draw(target)?;

    buf.clear();
    core::write!(buf, "Pts:{}", world.score).ok();
    Text::with_baseline(&buf, Point::new(1, 41), hud_style(), Baseline::Top).draw(target)?;

    Ok(())
}
