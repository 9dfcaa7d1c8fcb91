//! Raspberry Pi Pico - "Shoot a Thing!"
//!
//! A reaction shooter on an 84x48 playfield, centered on a 128x64 SSD1306
//! OLED. Buttons (active-low): GP13 = up, GP15 = down, GP14 = shoot.
//! LED (GP25): ON during gameplay, OFF otherwise.
//!
//! Move the marker, shoot the 3x3 target sitting in the lower-right
//! quadrant. Ten hits before the 10 s clock runs out wins; a shot leaving
//! the screen ends the game immediately.

#![no_std]
#![no_main]

use defmt::*;
use display_interface_spi::SPIInterface;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::spi::{self, Spi};
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};
use embedded_graphics::prelude::*;
use embedded_hal_bus::spi::ExclusiveDevice;
use ssd1306::Ssd1306;
use ssd1306::prelude::*;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use shoot_a_thing::{Buttons, Game, GameClock, Phase, Rng, TICK_MS, Transition, draw};

// Frame period; also the only debouncing the buttons get.
const FRAME_MS: u64 = 50;

// Top-left corner of the 84x48 playfield on the 128x64 panel.
const PLAYFIELD_X: i32 = 22;
const PLAYFIELD_Y: i32 = 8;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

#[embassy_executor::task]
async fn logger_task(driver: Driver<'static, USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver);
}

/// The game clock: +100 ms per tick, asynchronously to the frame loop.
/// The body is the single atomic add, nothing else.
#[embassy_executor::task]
async fn clock_task(clock: &'static GameClock) {
    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS as u64));
    loop {
        ticker.next().await;
        clock.tick();
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // USB serial logger
    let usb_driver = Driver::new(p.USB, Irqs);
    unwrap!(spawner.spawn(logger_task(usb_driver)));
    Timer::after(Duration::from_secs(2)).await;
    log::info!("=== Shoot a Thing ===");

    // Onboard LED (GP25 on Pico)
    let mut led = Output::new(p.PIN_25, Level::Low);

    // SSD1306 display over SPI0
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 8_000_000;
    let spi_bus = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let mut rst = Output::new(p.PIN_21, Level::High);
    let spi_device = ExclusiveDevice::new_no_delay(spi_bus, cs).unwrap();
    let interface = SPIInterface::new(spi_device, dc);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.reset(&mut rst, &mut Delay).unwrap();
    display.init().unwrap();
    display.clear_buffer();
    display.flush().unwrap();
    log::info!("Display ready!");

    // Buttons (active-low, pull-up)
    let btn_up = Input::new(p.PIN_13, Pull::Up);
    let btn_down = Input::new(p.PIN_15, Pull::Up);
    let btn_fire = Input::new(p.PIN_14, Pull::Up);

    // Game clock task, sharing one counter with the frame loop
    static CLOCK: StaticCell<GameClock> = StaticCell::new();
    let clock: &'static GameClock = CLOCK.init(GameClock::new());
    unwrap!(spawner.spawn(clock_task(clock)));

    // Fixed seed until the first button press supplies a human-timed one
    let mut rng = Rng::new(12345);
    let mut rng_seeded = false;
    let mut game = Game::new(&mut rng);

    log::info!("Entering game loop");

    loop {
        let frame_start = Instant::now();

        let buttons = Buttons {
            up: btn_up.is_low(),
            down: btn_down.is_low(),
            fire: btn_fire.is_low(),
        };

        if !rng_seeded && buttons.any() {
            rng = Rng::new(Instant::now().as_ticks() as u32);
            rng_seeded = true;
        }

        match game.step(buttons, clock, &mut rng) {
            Transition::Started => {
                led.set_high();
                log::info!("Session start");
            }
            Transition::Lost => {
                led.set_low();
                log::info!("Game over");
            }
            Transition::Won => {
                led.set_low();
                log::info!("You win!");
            }
            Transition::BackToIntro => log::info!("Waiting for shoot"),
            Transition::None => {}
        }

        display.clear_buffer();
        {
            let mut playfield = display.translated(Point::new(PLAYFIELD_X, PLAYFIELD_Y));
            match game.phase {
                Phase::Intro => draw::intro(&mut playfield),
                Phase::Playing => draw::playing(&mut playfield, &game.world, clock.elapsed_ms()),
                Phase::GameOver => draw::game_over(&mut playfield),
                Phase::Victory => draw::victory(&mut playfield),
            }
            .unwrap();
        }
        display.flush().unwrap();

        // Fixed 50 ms cadence, measured from the frame start
        Timer::at(frame_start + Duration::from_millis(FRAME_MS)).await;
    }
}
