use std::path::PathBuf;
use std::process;

mod keymap;
mod run;

fn main() {
    let mut rom: Option<PathBuf> = None;
    let mut trace = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--trace" => trace = true,
            _ => rom = Some(PathBuf::from(arg)),
        }
    }

    let rom = match rom {
        Some(path) => path,
        None => {
            eprintln!("usage: viper8-sdl <rom> [--trace]");
            process::exit(2);
        }
    };

    if let Err(e) = run::run(rom, trace) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
