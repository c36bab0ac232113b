use anyhow::Context;
use clap::Parser;

use rc8_engine::{Emulator, Quirks};

mod app;
mod keymap;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// ROM file to load
    #[clap(value_parser)]
    filename: String,

    /// Number of instructions to execute
    #[clap(long, value_parser, default_value_t = 600)]
    steps: usize,

    /// Keys held down during the run (1234/QWER/ASDF/ZXCV layout)
    #[clap(long, value_parser, default_value = "")]
    hold: String,

    /// Seed for the random number generator
    #[clap(long, value_parser)]
    seed: Option<u64>,

    /// Set VF to 0/1 on 8XYE instead of the raw shifted-out bit
    #[clap(long, action)]
    normalize_shift_flag: bool,

    /// Stop the timers while FX0A waits for a key
    #[clap(long, action)]
    freeze_timers_while_waiting: bool,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    // parse command-line arguments
    let cli = Cli::parse();

    let held = keymap::Keymap::Chip8
        .held_keys(&cli.hold)
        .context("invalid --hold keys")?;

    // open the rom file
    let rom = std::fs::File::open(&cli.filename)
        .with_context(|| format!("error opening rom file: {}", &cli.filename))?;

    // load the rom and build the emulator
    let mut emu = Emulator::load_rom(rom).context("error loading rom")?;
    emu = emu.with_quirks(Quirks {
        normalize_shift_flag: cli.normalize_shift_flag,
        timers_while_waiting: !cli.freeze_timers_while_waiting,
    });
    if let Some(seed) = cli.seed {
        emu = emu.with_seed(seed);
    }

    // run
    let options = app::RunOptions {
        steps: cli.steps,
        held,
    };
    let summary = app::run(&mut emu, &options)?;

    if let Some(frame) = &summary.last_frame {
        print!("{}", app::render(frame));
    }
    println!(
        "{} steps, {} frames, PC={:#05X} I={:#05X} V={:02X?}",
        summary.steps,
        summary.frames,
        emu.pc(),
        emu.i(),
        emu.registers()
    );
    Ok(())
}
