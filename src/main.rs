use anyhow::{bail, Result};
use std::path::PathBuf;

use phototz::config::Config;
use phototz::{logging, PhotoHandle, PhotosDb, Timezone, TimezoneUpdater};

#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    library: Option<PathBuf>,
    offset: Option<i32>,
    name: Option<String>,
    inspect: bool,
    conditioned: bool,
    uuids: Vec<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("phototz {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                cli.config_path = Some(PathBuf::from(require_value(&args, i, "--config")));
                i += 1;
            }
            "--library" | "-L" => {
                cli.library = Some(PathBuf::from(require_value(&args, i, "--library")));
                i += 1;
            }
            "--offset" => {
                let value = require_value(&args, i, "--offset");
                match value.parse() {
                    Ok(secs) => cli.offset = Some(secs),
                    Err(_) => {
                        eprintln!("Error: --offset expects an integer number of seconds");
                        std::process::exit(1);
                    }
                }
                i += 1;
            }
            "--name" => {
                cli.name = Some(require_value(&args, i, "--name").to_string());
                i += 1;
            }
            "--inspect" => cli.inspect = true,
            "--strict" => cli.conditioned = true,
            arg if arg.starts_with('-') => {
                eprintln!("Unknown argument: {arg}");
                print_help();
                std::process::exit(1);
            }
            uuid => cli.uuids.push(uuid.to_string()),
        }
        i += 1;
    }

    cli
}

fn require_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {flag} requires an argument");
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        r#"phototz - inspect and rewrite timezone metadata in an Apple Photos library

WARNING: this writes directly to the undocumented Photos database.
Back up your library first.

USAGE:
    phototz [OPTIONS] UUID...

OPTIONS:
    --library, -L PATH  Path to the .photoslibrary bundle
    --offset SECONDS    New UTC offset in seconds (e.g. -18000 for UTC-5)
    --name NAME         New timezone name (e.g. America/Denver)
    --inspect           Print each asset's current timezone instead of updating
    --strict            Fail a photo when another writer races the update
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    PHOTOTZ_LOG         Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/phototz/config.toml"#
    );
}

fn main() -> Result<()> {
    let args = parse_args();
    logging::init();

    let config = match &args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if args.uuids.is_empty() {
        bail!("no asset UUIDs given; see --help");
    }

    let library = args.library.or(config.library_path);
    let db = PhotosDb::open(library.as_deref())?;

    if args.inspect {
        for uuid in &args.uuids {
            match db.get_timezone(uuid) {
                Ok((secs, offset_str, name)) => {
                    println!("{uuid}: {name} ({offset_str}, {secs} seconds)")
                }
                Err(e) => eprintln!("{uuid}: {e}"),
            }
        }
        return Ok(());
    }

    let (offset, name) = match (args.offset, args.name) {
        (Some(offset), Some(name)) => (offset, name),
        _ => bail!("--offset and --name are required unless --inspect is given"),
    };
    let timezone = Timezone::new(offset, name)?;

    let updater = TimezoneUpdater::new(db, timezone)
        .with_retry_policy(config.retry.policy())
        .with_conditioned_writes(args.conditioned)
        .with_verbose(Box::new(|msg| println!("{msg}")));

    for uuid in &args.uuids {
        updater.update_photo(&PhotoHandle::new(uuid.clone()));
    }

    Ok(())
}
