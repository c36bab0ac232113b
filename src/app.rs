use anyhow::Context;
use log::info;

use rc8_engine::{Display, Emulator, KEY_COUNT};

/// How the headless driver runs a program
pub struct RunOptions {
    /// number of engine steps to execute
    pub steps: usize,

    /// keys held down for the whole run
    pub held: [bool; KEY_COUNT],
}

/// What a finished run looked like
#[derive(Debug)]
pub struct Summary {
    pub steps: usize,
    pub frames: usize,
    pub last_frame: Option<Display>,
}

/// Main driver loop, with no window attached.
///
/// Every step pushes the key state, advances the engine, and takes the frame
/// whenever the engine flags a redraw.
pub fn run(emu: &mut Emulator, options: &RunOptions) -> Result<Summary, anyhow::Error> {
    let mut summary = Summary {
        steps: 0,
        frames: 0,
        last_frame: None,
    };

    for step in 0..options.steps {
        emu.set_keys(options.held);
        emu.step()
            .with_context(|| format!("emulation stopped after {} steps", step))?;
        summary.steps += 1;

        if let Some(frame) = emu.take_frame() {
            summary.frames += 1;
            summary.last_frame = Some(frame.clone());
        }
    }

    info!(
        "ran {} steps, {} frames, PC at {:#05X}",
        summary.steps,
        summary.frames,
        emu.pc()
    );
    Ok(summary)
}

/// Draw a frame as text, `#` for lit pixels and `.` for dark ones
pub fn render(frame: &Display) -> String {
    let mut out = String::with_capacity(frame.pixels().len() + frame.iter_rows().count());
    for row in frame.iter_rows() {
        out.extend(row.iter().map(|&pixel| if pixel == 1 { '#' } else { '.' }));
        out.push('\n');
    }
    out
}
