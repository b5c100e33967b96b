use console::{style, Term};
use std::process;
use syspal::PaletteError;
use syspal_windows::{Command, USAGE};

fn main() {
    env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let command = match Command::parse(&args[..]) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}\n\n{}", style(err).red(), USAGE);
            process::exit(2);
        }
    };

    match execute(&command) {
        Ok(output) => {
            if let Err(err) = Term::stdout().write_str(&output) {
                log::error!("Could not write to stdout: {}", err);
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{} {:?}", style("Palette operation failed:").red(), err);
            process::exit(1);
        }
    }
}

#[cfg(windows)]
fn execute(command: &Command) -> Result<String, PaletteError> {
    command.execute(&syspal_windows::GdiDisplay)
}

#[cfg(not(windows))]
fn execute(command: &Command) -> Result<String, PaletteError> {
    log::warn!("GDI is not available on this platform, using a virtual palette display");
    command.execute(&syspal::VirtualDisplay::palette_display())
}
