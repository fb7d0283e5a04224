//! Sol-R flight stick LED CLI tool
//!
//! Both halves of the Thrustmaster Sol-R stick accept raw LED packets on a bulk endpoint of
//! their second interface, see [`packet`] for the wire format.

use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};
use std::process;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::builder::EnumValueParser;
use clap::{
    crate_description, crate_name, crate_version, Arg, ArgAction, ArgGroup, ArgMatches, Command,
    ValueEnum,
};
use rusb::{Device, GlobalContext};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::animation::{Breathing, Rainbow, FRAME_INTERVAL};
use crate::color::Rgb;
use crate::controller::LedController;
use crate::error::{Error, Result};
use crate::packet::LedColorMap;
use crate::registry::{Group, LedId};

mod animation;
mod color;
mod controller;
mod error;
mod packet;
mod registry;
mod usb;

/// Stick half.
#[derive(ValueEnum, PartialEq, Eq, Debug, Copy, Clone)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// USB product ID.
    pub fn product_id(self) -> u16 {
        match self {
            Self::Left => 0x042a,
            Self::Right => 0x0422,
        }
    }

    pub fn from_product_id(product_id: u16) -> Option<Self> {
        Self::value_variants().iter().copied().find(|side| side.product_id() == product_id)
    }

    fn label(self) -> &'static str {
        match self {
            Self::Left => "Left Stick",
            Self::Right => "Right Stick",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.pad("left"),
            Self::Right => f.pad("right"),
        }
    }
}

/// LEDs selected on the command line.
#[derive(PartialEq, Eq, Debug, Clone)]
enum Target {
    Group(Group),
    Buttons(Vec<u32>),
    Leds(Vec<LedId>),
}

impl Target {
    fn leds(&self) -> Result<Vec<LedId>> {
        match self {
            Self::Group(group) => Ok(group.leds().to_vec()),
            Self::Buttons(buttons) => registry::resolve_buttons(buttons),
            Self::Leds(leds) => Ok(leds.clone()),
        }
    }
}

/// Color effect.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
enum Effect {
    Static(Rgb),
    Breathing(Rgb),
    Rainbow,
}

/// New color config.
#[derive(Debug)]
struct Config {
    side: Side,
    target: Target,
    effect: Effect,
}

impl Config {
    fn from_cli(matches: &ArgMatches) -> Result<Self> {
        let side = *matches.get_one::<Side>("device").ok_or(Error::MissingArgument("--device"))?;

        let target = if let Some(group) = matches.get_one::<Group>("group") {
            Target::Group(*group)
        } else if let Some(buttons) = matches.get_one::<String>("buttons") {
            Target::Buttons(registry::parse_buttons(buttons)?)
        } else if let Some(leds) = matches.get_one::<String>("leds") {
            Target::Leds(registry::resolve_leds(leds)?)
        } else {
            return Err(Error::MissingArgument("--group, --buttons or --leds"));
        };

        let color = || -> Result<Rgb> {
            let color = matches.get_one::<String>("color").ok_or(Error::MissingArgument("COLOR"))?;
            Rgb::from_str(color)
        };

        let effect = if matches.get_flag("rainbow") {
            Effect::Rainbow
        } else if matches.get_flag("breathing") {
            Effect::Breathing(color()?)
        } else {
            Effect::Static(color()?)
        };

        Ok(Self { side, target, effect })
    }
}

fn main() {
    init_logging();

    let matches = cli();
    let result = match matches.subcommand() {
        Some(("list", _)) => list(),
        Some(("interactive", matches)) => interactive(matches),
        _ if matches.get_flag("list") => list(),
        _ => solr_led(&matches),
    };

    if let Err(err) = result {
        eprintln!("\x1b[31mError:\x1b[0m {err}");
        process::exit(1);
    }
}

/// Log to STDERR, filtered by `RUST_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Print all devices, groups, buttons and LEDs.
fn list() -> Result<()> {
    let mut stdout = io::stdout().lock();
    registry::write_listing(&mut stdout)?;
    writeln!(
        stdout,
        "\nUse --device with left or right, and specify --group, --buttons or --leds with a color."
    )?;
    Ok(())
}

/// Apply a color or animation from the CLI parameters.
fn solr_led(matches: &ArgMatches) -> Result<()> {
    let config = Config::from_cli(matches)?;
    debug!("Applying {:?}", config);

    // Resolve everything before claiming the device.
    let leds = config.target.leds()?;

    let mut session = usb::open_side(config.side)?;

    match config.effect {
        Effect::Static(color) => {
            session.apply(&packet::uniform(&leds, color))?;
            println!("\x1b[32mLED colors updated.\x1b[0m");
        },
        Effect::Breathing(color) => {
            let running = setup_interrupt_handler();
            let frames = Breathing::new(color);
            animation::animate(&mut session, &leds, frames, &running, FRAME_INTERVAL)?;
            println!("\nBreathing effect stopped by user.");
        },
        Effect::Rainbow => {
            let running = setup_interrupt_handler();
            animation::animate(&mut session, &leds, Rainbow::default(), &running, FRAME_INTERVAL)?;
            println!("\nRainbow breathing stopped by user.");
        },
    }

    Ok(())
}

/// Assign colors to LEDs one prompt at a time.
fn interactive(matches: &ArgMatches) -> Result<()> {
    let devices = usb::find_devices()?;
    let device = select_device(matches.get_one::<Side>("device").copied(), &devices)?;

    registry::write_listing(&mut io::stdout().lock())?;

    let colors = prompt_colors();
    if colors.is_empty() {
        println!("No LEDs selected. Exiting.");
        return Ok(());
    }

    let mut session = usb::open(device)?;
    session.apply(&colors)?;
    println!("\x1b[32mLED colors updated.\x1b[0m");

    Ok(())
}

/// Pick the device to configure, prompting if multiple sticks are connected.
fn select_device(
    side: Option<Side>,
    devices: &[(Side, Device<GlobalContext>)],
) -> Result<&Device<GlobalContext>> {
    if let Some(side) = side {
        return devices
            .iter()
            .find(|(found, _)| *found == side)
            .map(|(_, device)| device)
            .ok_or(Error::DeviceNotFound(side));
    }

    match devices {
        [] => Err(Error::NoDevices),
        [(side, device)] => {
            println!("Found one device: {}", side.label());
            Ok(device)
        },
        _ => loop {
            println!("Multiple devices found:");
            for (i, (side, _)) in devices.iter().enumerate() {
                println!("  [{}] {}", i, side.label());
            }
            print!("Select device number:\n > ");
            let _ = io::stdout().flush();

            let input = stdin_nextline().ok_or(io::Error::from(io::ErrorKind::UnexpectedEof))?;

            match usize::from_str(&input).ok().and_then(|index| devices.get(index)) {
                Some((_, device)) => {
                    println!();
                    break Ok(device);
                },
                None => println!("\x1b[31mInvalid choice '{}', please try again.\x1b[0m\n", input),
            }
        },
    }
}

/// Read LED selections and their colors from STDIN until the user is done.
fn prompt_colors() -> LedColorMap {
    let mut colors = LedColorMap::new();

    loop {
        print!("\nEnter LED ID (hex like 00) or group name (e.g. tm_logo), or 'done':\n > ");
        let _ = io::stdout().flush();

        let input = match stdin_nextline() {
            Some(input) => input.to_lowercase(),
            None => break,
        };
        if input == "done" {
            break;
        }

        let leds = match registry::resolve_selection(&input) {
            Ok(leds) => leds,
            Err(err) => {
                eprintln!("\x1b[31m{}, please try again.\x1b[0m", err);
                continue;
            },
        };

        print!("Enter color (RRGGBB hex, e.g. FF0000 for red):\n > ");
        let _ = io::stdout().flush();

        let input = stdin_nextline().unwrap_or_default();
        match Rgb::from_str(&input) {
            Ok(color) => {
                for led in leds {
                    colors.insert(led, color);
                    let label = registry::label(led).unwrap_or_default();
                    println!("Set LED {} ({}) to #{}", led, label, color);
                }
            },
            Err(err) => eprintln!("\x1b[31m{}\x1b[0m", err),
        }
    }

    colors
}

/// Set up a Ctrl-C handler clearing the returned flag.
fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);

    if let Err(err) = ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst)) {
        warn!("Unable to install Ctrl-C handler: {}", err);
    }

    running
}

/// Get clap CLI parameters.
fn cli() -> ArgMatches {
    command().get_matches()
}

/// CLI definition.
fn command() -> Command {
    let device = Arg::new("device")
        .help("Stick half to configure")
        .long("device")
        .short('d')
        .ignore_case(true)
        .value_parser(EnumValueParser::<Side>::new());

    Command::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .subcommand(Command::new("list").about("List devices, groups and buttons"))
        .subcommand(
            Command::new("interactive")
                .about("Interactively assign colors to LEDs")
                .arg(device.clone()),
        )
        .arg(
            Arg::new("list")
                .help("List devices, groups and buttons")
                .long("list")
                .short('l')
                .action(ArgAction::SetTrue),
        )
        .arg(device)
        .arg(
            Arg::new("group")
                .help("Group of LEDs to set")
                .long("group")
                .short('g')
                .ignore_case(true)
                .value_parser(EnumValueParser::<Group>::new()),
        )
        .arg(
            Arg::new("buttons")
                .help("Comma-separated list of button numbers to set (e.g. 5,6,7)")
                .long("buttons")
                .short('b'),
        )
        .arg(
            Arg::new("leds")
                .help("Comma-separated list of hex LED IDs to set (e.g. 00,11)")
                .long("leds"),
        )
        .group(ArgGroup::new("target").args(["group", "buttons", "leds"]))
        .arg(
            Arg::new("breathing")
                .help("Make LEDs breathe (pulse) with a fixed color")
                .long("breathing")
                .action(ArgAction::SetTrue)
                .conflicts_with("rainbow"),
        )
        .arg(
            Arg::new("rainbow")
                .help("Make LEDs breathe with rainbow colors")
                .long("rainbow")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("color").help("LED color in RGB [RRGGBB], required unless --rainbow"))
}

/// Read next line from STDIN.
///
/// Returns `None` once STDIN is closed.
#[inline]
fn stdin_nextline() -> Option<String> {
    let mut input = String::new();

    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}
