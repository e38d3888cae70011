use std::path::PathBuf;

use clap::{Parser, Subcommand};

use geo_cli::commands::{config_ops, dict_ops, parse_ops};
use geo_cli::format::OutputFormat;

#[derive(Parser)]
#[command(name = "geotool", about = "Geoword dictionary and parsing tool")]
struct Cli {
    /// Dictionary store file
    #[arg(long, global = true, default_value = "geowords.gnls")]
    store: PathBuf,
    /// Word index file
    #[arg(long, global = true, default_value = "wordlist.gntx")]
    index: PathBuf,
    /// Custom settings TOML (default: embedded settings)
    #[arg(long, global = true)]
    settings: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a GeoNLP dictionary (CSV + optional JSON metadata)
    Import {
        /// Geoword CSV file with a header row
        csv_file: String,
        /// Dictionary metadata JSON (default: derived from the CSV file name)
        #[arg(long)]
        json: Option<String>,
    },
    /// Remove a dictionary by identifier
    Remove {
        /// Dictionary identifier (e.g. geonlp:ksj-station)
        identifier: String,
    },
    /// List imported dictionaries
    List,
    /// Rebuild the word index from the store
    BuildIndex,
    /// Look up geowords by exact surface or reading
    Lookup {
        /// Surface or reading
        key: String,
    },
    /// Resolve geowords in MeCab output read from stdin
    Parse {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Mecab)]
        format: OutputFormat,
        /// Active dictionary ids (repeatable; default: all)
        #[arg(long = "dictionary")]
        dictionaries: Vec<u32>,
        /// Active class patterns, `-` prefix to exclude (repeatable)
        #[arg(long = "class")]
        classes: Vec<String>,
        /// Keep geowords whose validity relates to the period this way
        #[arg(
            long,
            value_parser = ["exists", "before", "after", "overlaps", "covers", "contains"],
            requires = "from"
        )]
        temporal: Option<String>,
        /// Period start (YYYY-MM-DD)
        #[arg(long, requires = "temporal")]
        from: Option<String>,
        /// Period end (default: the start date)
        #[arg(long, requires = "temporal")]
        to: Option<String>,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geo_core=info,geo_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    config_ops::init_settings(cli.settings.as_deref());

    match cli.command {
        Command::Import { csv_file, json } => {
            dict_ops::import(&cli.store, &csv_file, json.as_deref())
        }
        Command::Remove { identifier } => dict_ops::remove(&cli.store, &identifier),
        Command::List => dict_ops::list(&cli.store),
        Command::BuildIndex => dict_ops::build_index(&cli.store, &cli.index),
        Command::Lookup { key } => dict_ops::lookup(&cli.store, &key),
        Command::Parse {
            format,
            dictionaries,
            classes,
            temporal,
            from,
            to,
        } => {
            let opts = parse_ops::ParseOptions {
                dictionaries,
                classes,
                temporal,
                date_from: from,
                date_to: to,
                format,
            };
            parse_ops::parse(&cli.store, &cli.index, &opts);
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
