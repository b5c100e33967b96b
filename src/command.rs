use super::dump;
use std::fmt;
use std::num::ParseIntError;
use syspal::{
    apply_palette, build, clear_system_palette, copy_palette_with_flag, device_palette_info,
    identity_palette, spectrum, system_palette, CollapseBehavior, PaletteDevice, PaletteError,
    RgbQuad, MAX_PALETTE_SIZE,
};

pub const USAGE: &str = "\
Usage: syspal-cli <command>

Commands:
  info                   Palette capabilities of the display
  system [nocollapse]    Dump the hardware palette, optionally reflagged as NoCollapse
  spectrum               Dump the general-purpose RGB cube palette
  build <color>...       Dump the logical palette for a bitmap color table
  identity <color>...    Lay out and realize an identity palette for the colors
  clear                  Reset the hardware palette to black
  help                   Show this text

Colors are 24 bit 0xRRGGBB values. Set RUST_LOG=debug for details.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Info,
    System(Option<CollapseBehavior>),
    Spectrum,
    Build(Vec<RgbQuad>),
    Identity(Vec<RgbQuad>),
    Clear,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand(String),
    UnexpectedArgument(String),
    MissingColors,
    TooManyColors(usize),
    InvalidColor(String, ParseIntError),
    ColorOutOfRange(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(cmd) => write!(f, "Unknown command '{}'", cmd),
            CommandError::UnexpectedArgument(arg) => write!(f, "Unexpected argument '{}'", arg),
            CommandError::MissingColors => write!(f, "Needs argument: At least one color"),
            CommandError::TooManyColors(n) => write!(
                f,
                "{} colors given, a palette holds at most {}",
                n, MAX_PALETTE_SIZE
            ),
            CommandError::InvalidColor(arg, err) => {
                write!(f, "Could not parse color '{}': {}", arg, err)
            }
            CommandError::ColorOutOfRange(arg) => {
                write!(f, "Color '{}' doesn't fit into 0xRRGGBB", arg)
            }
        }
    }
}

impl Command {
    /// Parses the program arguments, without the program name itself. No
    /// arguments at all means [`Command::Help`].
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Command, CommandError> {
        let (name, rest) = match args.split_first() {
            Some((name, rest)) => (name.as_ref(), rest),
            None => return Ok(Command::Help),
        };

        match name {
            "info" => no_args(rest, Command::Info),
            "system" => match rest {
                [] => Ok(Command::System(None)),
                [flag] if flag.as_ref() == "nocollapse" => {
                    Ok(Command::System(Some(CollapseBehavior::NoCollapse)))
                }
                [other, ..] => Err(CommandError::UnexpectedArgument(other.as_ref().to_string())),
            },
            "spectrum" => no_args(rest, Command::Spectrum),
            "build" => parse_colors(rest).map(Command::Build),
            "identity" => parse_colors(rest).map(Command::Identity),
            "clear" => no_args(rest, Command::Clear),
            "help" | "-h" | "--help" => Ok(Command::Help),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    /// Runs the command against `device` and returns what should be printed
    pub fn execute<D: PaletteDevice>(&self, device: &D) -> Result<String, PaletteError> {
        match self {
            Command::Info => Ok(dump::device_info(&device_palette_info(device)?)),
            Command::System(None) => Ok(dump::table(&system_palette(device)?)),
            Command::System(Some(flag)) => {
                let snapshot = system_palette(device)?;
                Ok(dump::table(&copy_palette_with_flag(
                    snapshot.entries(),
                    *flag,
                )?))
            }
            Command::Spectrum => Ok(dump::table(&spectrum())),
            Command::Build(colors) => Ok(dump::table(&build(colors)?)),
            Command::Identity(colors) => {
                let palette = identity_palette(device, colors)?;
                let changed = apply_palette(device, palette.table())?;

                let mut output = dump::identity(&palette);
                output.push_str(&dump::changed_slots(changed));
                Ok(output)
            }
            Command::Clear => Ok(dump::changed_slots(clear_system_palette(device)?)),
            Command::Help => Ok(format!("{}\n", USAGE)),
        }
    }
}

fn no_args<S: AsRef<str>>(rest: &[S], command: Command) -> Result<Command, CommandError> {
    match rest.first() {
        Some(arg) => Err(CommandError::UnexpectedArgument(arg.as_ref().to_string())),
        None => Ok(command),
    }
}

fn parse_colors<S: AsRef<str>>(args: &[S]) -> Result<Vec<RgbQuad>, CommandError> {
    if args.is_empty() {
        return Err(CommandError::MissingColors);
    }

    if args.len() > MAX_PALETTE_SIZE {
        return Err(CommandError::TooManyColors(args.len()));
    }

    args.iter().map(|arg| parse_color(arg.as_ref())).collect()
}

fn parse_color(arg: &str) -> Result<RgbQuad, CommandError> {
    let rgb: u32 = parse_int::parse(arg)
        .map_err(|err| CommandError::InvalidColor(arg.to_string(), err))?;

    if rgb > 0xFF_FFFF {
        return Err(CommandError::ColorOutOfRange(arg.to_string()));
    }

    Ok(RgbQuad::from_rgb24(rgb))
}
