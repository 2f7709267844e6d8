use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use cavemap::{CaveMap, MapConfig, Survey};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "cavemap")]
#[command(about = "Underwater cave survey mapper", long_about = None)]
struct Cli {
    /// Map name.
    #[arg(long, default_value = "cave", global = true)]
    name: String,

    /// Log per-line and per-station diagnostics.
    #[arg(long, global = true)]
    debug: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the map from survey files and write it as GeoJSON.
    Geojson {
        /// Survey files, committed in order.
        #[arg(long = "survey", required = true)]
        surveys: Vec<PathBuf>,

        /// Name prefix for `auto` surveys (default: the file stem).
        #[arg(long)]
        prefix: Option<String>,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Print each anchor and the legs below it.
    Show {
        #[arg(long = "survey", required = true)]
        surveys: Vec<PathBuf>,

        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print a single survey as notes or as Walls SRV shots.
    Survey {
        #[arg(long)]
        survey: PathBuf,

        /// Surveys to commit first, so the start station resolves.
        #[arg(long = "after")]
        after: Vec<PathBuf>,

        #[arg(long)]
        prefix: Option<String>,

        #[arg(long)]
        srv: bool,
    },
}

fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn read_survey(map: &CaveMap, path: &Path, prefix: Option<&str>) -> Result<Survey> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read survey file {}", path.display()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = prefix.unwrap_or(&stem);
    let survey = map
        .parse_survey(&text, prefix)
        .with_context(|| format!("parse survey {}", path.display()))?;
    Ok(survey)
}

fn load_map(map: &CaveMap, surveys: &[PathBuf], prefix: Option<&str>) -> Result<()> {
    for path in surveys {
        let survey = read_survey(map, path, prefix)?;
        map.validate(&survey.stations)
            .with_context(|| format!("validate survey {}", path.display()))?;
        map.add_survey(survey)
            .with_context(|| format!("add survey {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.log_file.as_deref())?;

    let map = CaveMap::with_config(cli.name, MapConfig { debug: cli.debug });

    match cli.cmd {
        Commands::Geojson {
            surveys,
            prefix,
            out,
        } => {
            load_map(&map, &surveys, prefix.as_deref())?;
            map.propagate();
            let export = map.export()?;
            match out {
                Some(out) => {
                    fs::write(&out, &export.geojson)
                        .with_context(|| format!("write {}", out.display()))?;
                    println!("Wrote {}", out.display());
                }
                None => println!("{}", export.geojson),
            }
        }
        Commands::Show { surveys, prefix } => {
            load_map(&map, &surveys, prefix.as_deref())?;
            print!("{}", map.outline());
        }
        Commands::Survey {
            survey,
            after,
            prefix,
            srv,
        } => {
            load_map(&map, &after, prefix.as_deref())?;
            let parsed = read_survey(&map, &survey, prefix.as_deref())?;
            if srv {
                print!("{}", map.survey_as_srv(&parsed)?);
            } else {
                print!("{}", cavemap::render::format_survey(&parsed));
            }
        }
    }

    Ok(())
}
