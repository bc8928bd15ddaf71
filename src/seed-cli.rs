//! A CLI tool for (re)initialising the database from a JSON property catalogue.
//! This uses the same configuration sources as the server, so it always
//! targets the database the server would use.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use mongodb::bson::Document;
use rocket::serde::json::serde_json;

use schwudelrudel_backend::{config, seed};

const PROGRAM_NAME: &str = "seed-cli";

const ABOUT_TEXT: &str = "Load vacation properties into the database and create indexes.

Connection settings are read like the server's: `.env`, `Rocket.toml`,
`ROCKET_*`, then `MONGODB_URI` and `DATABASE_NAME`.";

const FILE: &str = "FILE";

const FILE_HELP: &str = "Path to a JSON array of property documents";

const KEEP: &str = "KEEP";

const KEEP_HELP: &str = "Add to the existing properties instead of replacing them";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(FILE)
                .help(FILE_HELP)
                .long("file")
                .short('f')
                .action(ArgAction::Set)
                .default_value("vacation_properties.json"),
        )
        .arg(
            Arg::new(KEEP)
                .help(KEEP_HELP)
                .long("keep")
                .action(ArgAction::SetTrue),
        )
}

/// Errors that this program may produce.
#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("Could not read {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Could not parse {0}: {1}")]
    Format(String, serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] rocket::figment::Error),
    #[error(transparent)]
    Db(#[from] mongodb::error::Error),
}

/// Read the property catalogue: a JSON array of objects.
fn read_catalogue(path: &Path) -> Result<Vec<Document>, Error> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| Error::Io(display.clone(), e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::Format(display, e))
}

async fn run(args: &ArgMatches) -> Result<(), Error> {
    // Unwrap safe because the argument has a default.
    let path = Path::new(args.get_one::<String>(FILE).unwrap());
    let keep_existing = args.get_flag(KEEP);

    let properties = read_catalogue(path)?;
    println!("Read {} properties from {}", properties.len(), path.display());

    let db_config = config::figment().extract::<config::DbConfig>()?;
    let (_client, db) = db_config.connect().await?;
    println!("Connected to database {}", db.name());

    let report = seed::seed_properties(&db, properties, keep_existing).await?;

    if !keep_existing {
        println!("Cleared {} existing properties", report.cleared);
    }
    println!("Inserted {} properties", report.inserted);
    println!("Database initialised successfully");
    Ok(())
}

#[rocket::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = cli().get_matches();
    if let Err(err) = run(&args).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn catalogue_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn catalogue_is_an_array_of_objects() {
        let file = catalogue_file(br#"[{"name": "Casa Azul"}, {"name": "Hytte Nord", "beds": 5}]"#);
        let properties = read_catalogue(file.path()).unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[1].get_str("name").unwrap(), "Hytte Nord");
    }

    #[test]
    fn single_object_is_rejected() {
        let file = catalogue_file(br#"{"name": "not an array"}"#);
        assert!(matches!(read_catalogue(file.path()), Err(Error::Format(..))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let file = catalogue_file(b"[]");
        let path = file.path().to_path_buf();
        drop(file);
        assert!(matches!(read_catalogue(&path), Err(Error::Io(..))));
    }
}
