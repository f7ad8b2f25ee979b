use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Scancode};

use display::Display;
use viper8::{Interpreter, Status, BASE_STEP_HZ};

use crate::keymap::pressed_keys;

pub fn run(rom: PathBuf, trace: bool) -> Result<(), String> {
    let mut vm = Interpreter::new();
    vm.set_trace(trace);

    // Load ROM
    let file = File::open(&rom).map_err(|e| format!("unable to open {}: {}", rom.display(), e))?;
    let size = file.metadata().map_err(|e| e.to_string())?.len();
    let mut reader = BufReader::new(file);
    vm.load_rom(&mut reader).map_err(|e| e.to_string())?;
    println!("loaded {} byte ROM {}", size, rom.display());

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl)?;
    let mut events = sdl.event_pump()?;

    // Steps per second are BASE_STEP_HZ times the speed level
    let mut speed: u32 = 3;
    let mut last_step = Instant::now();

    'event: loop {
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                _ => continue,
            }
        }

        let keyboard = events.keyboard_state();
        let keys = pressed_keys(&keyboard);
        speed = adjust_speed(
            keyboard.is_scancode_pressed(Scancode::J),
            keyboard.is_scancode_pressed(Scancode::K),
            speed,
        );

        match vm.step(&keys) {
            Ok(Status::Halted) => {
                println!("program halted");
                break 'event;
            }
            Ok(_) => {}
            Err(e) => {
                vm.dump_state();
                return Err(e.to_string());
            }
        }

        if let Some(frame) = vm.take_frame() {
            display.render(frame)?;
        }

        // The interpreter owns no clock, so all pacing happens here
        let step_time = Duration::from_secs(1) / (BASE_STEP_HZ * speed);
        let now = Instant::now();
        let elapsed = now - last_step;
        if step_time > elapsed {
            std::thread::sleep(step_time - elapsed);
        }
        last_step = now;
    }

    Ok(())
}

/// Speed levels run 1 through 10; J eases off, K speeds up.
fn adjust_speed(slower: bool, faster: bool, speed: u32) -> u32 {
    if slower && speed > 1 {
        speed - 1
    } else if faster && speed < 10 {
        speed + 1
    } else {
        speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_speed_slows_to_the_floor() {
        assert_eq!(adjust_speed(true, false, 2), 1);
        assert_eq!(adjust_speed(true, false, 1), 1);
    }

    #[test]
    fn test_adjust_speed_raises_to_the_ceiling() {
        assert_eq!(adjust_speed(false, true, 9), 10);
        assert_eq!(adjust_speed(false, true, 10), 10);
    }

    #[test]
    fn test_adjust_speed_prefers_slower() {
        assert_eq!(adjust_speed(true, true, 5), 4);
    }

    #[test]
    fn test_adjust_speed_holds_steady() {
        assert_eq!(adjust_speed(false, false, 5), 5);
    }
}
