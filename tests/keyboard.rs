#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for the scan → feedback → display cycle.

mod common;

use common::{CountingDisplay, MockColumn, MockDelay, MockRow, MockTransport, SwitchBoard};
use embassy_futures::block_on;
use momo_keypad::feedback::{ACTIVE_COLOR_DEFAULT, INACTIVE_COLOR_DEFAULT};
use momo_keypad::keyboard::{Keyboard, KeyboardConfig};
use momo_keypad::led_strip::{Current, Gamma, Rgb, colors};

type Momo<const S: usize> =
    Keyboard<MockColumn, MockRow, MockTransport<12>, CountingDisplay, MockDelay, 12, 4, 3, S>;

struct Rig<const S: usize> {
    keyboard: Momo<S>,
    board: SwitchBoard,
    transport: MockTransport<12>,
    delay: MockDelay,
}

fn rig<const S: usize>(config: &KeyboardConfig<S>) -> Rig<S> {
    let board = SwitchBoard::new();
    let transport = MockTransport::new();
    let delay = MockDelay::new();
    let (columns, rows) = board.pins();
    let keyboard = Keyboard::new(
        columns,
        rows,
        transport.clone(),
        CountingDisplay::new(),
        delay.clone(),
        config,
    );
    Rig {
        keyboard,
        board,
        transport,
        delay,
    }
}

fn only_lit(index: usize, active: Rgb, inactive: Rgb) -> [Rgb; 12] {
    let mut expected = [inactive; 12];
    expected[index] = active;
    expected
}

#[test]
fn pressed_key_lights_its_led_for_one_cycle() {
    let mut rig = rig(&KeyboardConfig::DEFAULT);
    rig.board.press(2, 1);

    block_on(rig.keyboard.run_cycle());

    let pushes = rig.transport.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(
        pushes[0],
        only_lit(7, ACTIVE_COLOR_DEFAULT, INACTIVE_COLOR_DEFAULT)
    );
}

#[test]
fn cycle_renders_once_and_scrolls() {
    let mut rig = rig(&KeyboardConfig::DEFAULT);

    block_on(rig.keyboard.run_cycle());

    let display = rig.keyboard.display();
    assert_eq!((display.clears, display.flushes), (1, 1));
    assert!(display.frame.lit_pixel_count() > 0);
    assert_eq!(rig.keyboard.renderer().scroll_text().as_str(), "BCEFA");
}

#[test]
fn cycle_waits_for_each_column_then_the_period() {
    let mut rig = rig(&KeyboardConfig::DEFAULT);

    block_on(rig.keyboard.run_cycle());

    assert_eq!(
        rig.delay.waits_ns(),
        vec![1_000_000, 1_000_000, 1_000_000, 1_000_000, 100_000_000]
    );
}

#[test]
fn idle_cycle_pushes_all_inactive() {
    let mut rig = rig(&KeyboardConfig::DEFAULT);

    block_on(rig.keyboard.run_cycle());

    assert_eq!(
        rig.transport.last_push(),
        Some([INACTIVE_COLOR_DEFAULT; 12])
    );
}

#[test]
fn released_key_goes_dark_next_cycle() {
    let mut rig = rig(&KeyboardConfig::DEFAULT);
    rig.board.press(0, 0);
    block_on(rig.keyboard.run_cycle());
    rig.board.release(0, 0);
    block_on(rig.keyboard.run_cycle());

    let pushes = rig.transport.pushes();
    assert_eq!(pushes.len(), 2);
    assert_eq!(pushes[0][0], ACTIVE_COLOR_DEFAULT);
    assert_eq!(pushes[1], [INACTIVE_COLOR_DEFAULT; 12]);
}

#[test]
fn simultaneous_keys_all_light() {
    let mut rig = rig(&KeyboardConfig::DEFAULT);
    rig.board.press(0, 2);
    rig.board.press(3, 0);

    block_on(rig.keyboard.run_cycle());

    let pushed = rig.transport.last_push().expect("one frame pushed");
    let lit: Vec<usize> = pushed
        .iter()
        .enumerate()
        .filter(|(_, color)| **color == ACTIVE_COLOR_DEFAULT)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(lit, vec![2, 9]);
}

#[test]
fn power_on_clears_display_and_waits() {
    let mut rig = rig(&KeyboardConfig::DEFAULT);

    block_on(rig.keyboard.power_on());

    let display = rig.keyboard.display();
    assert_eq!((display.clears, display.flushes), (1, 1));
    assert_eq!(display.frame.lit_pixel_count(), 0);
    assert_eq!(rig.delay.waits_ns(), vec![50_000_000]);
    assert!(rig.transport.pushes().is_empty());
}

#[test]
fn power_on_survives_a_failing_display() {
    let board = SwitchBoard::new();
    let delay = MockDelay::new();
    let (columns, rows) = board.pins();
    let mut keyboard: Momo<5> = Keyboard::new(
        columns,
        rows,
        MockTransport::new(),
        CountingDisplay::failing(),
        delay.clone(),
        &KeyboardConfig::DEFAULT,
    );

    block_on(keyboard.power_on());
    block_on(keyboard.run_cycle());

    assert_eq!(keyboard.display().flushes, 2);
    assert_eq!(delay.waits_ns().len(), 1 + 4 + 1);
}

#[test]
fn configured_colors_reach_the_strip() {
    const CONFIG: KeyboardConfig<5> = KeyboardConfig::DEFAULT
        .with_active_color(colors::BLUE)
        .with_inactive_color(colors::RED);
    let mut rig = rig(&CONFIG);
    rig.board.press(1, 0);

    block_on(rig.keyboard.run_cycle());

    assert_eq!(
        rig.transport.last_push(),
        Some(only_lit(3, colors::BLUE, colors::RED))
    );
}

#[test]
fn current_budget_dims_only_what_is_pushed() {
    const CONFIG: KeyboardConfig<5> = KeyboardConfig::DEFAULT
        .with_active_color(colors::WHITE)
        .with_led_correction(Gamma::Linear, Current::Milliamps(250));
    let mut rig = rig(&CONFIG);
    rig.board.press(3, 2);

    block_on(rig.keyboard.run_cycle());

    let pushed = rig.transport.last_push().expect("one frame pushed");
    assert_eq!(pushed[11], Rgb::new(88, 88, 88));
    assert_eq!(rig.keyboard.strip().frame()[11], colors::WHITE);
}

#[test]
fn configured_settle_and_period_are_both_used() {
    const CONFIG: KeyboardConfig<5> = KeyboardConfig::DEFAULT.with_timing(
        embassy_time::Duration::from_micros(250),
        embassy_time::Duration::from_millis(20),
    );
    let mut rig = rig(&CONFIG);

    block_on(rig.keyboard.run_cycle());

    assert_eq!(
        rig.delay.waits_ns(),
        vec![250_000, 250_000, 250_000, 250_000, 20_000_000]
    );
}
