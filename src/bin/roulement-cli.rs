#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{error::ErrorKind, Parser, Subcommand};
use roulement::{
    bidding::{self, BiddingRequest},
    directory,
    report::{CsvReportRenderer, ReportRenderer, RosterReport},
    storage::{JsonRosterStore, PublishedRoster, RosterPeriod, Storage},
    Month, RosterEngine, RosterOptions,
};
use serde_json::json;
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de plannings en roulement
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Répertoire des plannings publiés
    #[arg(long, global = true, default_value = "rosters")]
    store: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le planning d'un mois et écrire les rapports CSV
    Generate {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Nombre d'employés à planifier
        #[arg(long)]
        employees: Option<usize>,
        /// Fichier d'options JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Annuaire CSV des employés
        #[arg(long)]
        directory: Option<PathBuf>,
        /// Graine du tirage des congés
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        vacation_fraction: Option<f64>,
        #[arg(long)]
        standby_per_shift: Option<usize>,
        #[arg(long)]
        standby_cap: Option<usize>,
        /// Répertoire de sortie des rapports
        #[arg(long, default_value = "out")]
        out: PathBuf,
        /// Enregistre aussi le planning dans le store
        #[arg(long)]
        publish: bool,
        /// Remplace un planning déjà publié
        #[arg(long)]
        force: bool,
    },

    /// Flux bidding : `year month totalLines`
    Bidding {
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Recontrôler un planning publié (couverture, séries)
    Check {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Lister les plannings publiés
    List,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let rendered = err.to_string();
                let msg = rendered
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ");
                println!("{}", bidding::error_json(&msg));
                std::process::exit(1);
            }
        },
    };

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            println!("{}", bidding::error_json(&format!("{err:#}")));
            1
        }
    };
    std::process::exit(code);
}

fn load_options(config: Option<&PathBuf>) -> Result<RosterOptions> {
    match config {
        Some(path) => RosterOptions::from_file(path),
        None => Ok(RosterOptions::default()),
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.cmd {
        Commands::Generate {
            year,
            month,
            employees,
            config,
            directory,
            seed,
            vacation_fraction,
            standby_per_shift,
            standby_cap,
            out,
            publish,
            force,
        } => {
            let month = Month::new(year, month)?;
            let mut opts = load_options(config.as_ref())?;
            if let Some(n) = employees {
                opts.total_employees = n;
            }
            if seed.is_some() {
                opts.vacation_seed = seed;
            }
            if let Some(f) = vacation_fraction {
                opts.vacation_fraction = f;
            }
            if let Some(n) = standby_per_shift {
                opts.standby_per_shift = n;
            }
            if let Some(n) = standby_cap {
                opts.standby_cap = n;
            }

            let store = JsonRosterStore::open(&cli.store)?;
            let engine = RosterEngine::new(opts)?;
            let dir = directory::load_directory(directory.as_deref(), engine.options());
            let mut roster = engine.generate(&dir.employees, month)?;
            if let Some(reason) = dir.reason {
                roster
                    .warnings
                    .insert(0, format!("directory degraded, synthesized employees used: {reason}"));
            }

            // Publication d'abord : un rapport n'est écrit que pour un planning enregistré.
            let mut stored = None;
            let mut previous = None;
            if publish {
                if force && store.exists(month) {
                    previous = store.load(month).ok();
                }
                let period = RosterPeriod::published(month, roster.employees.len(), Utc::now());
                let published = PublishedRoster {
                    period,
                    roster,
                    options: engine.options().clone(),
                };
                stored = Some(store.save(&published, force)?);
                roster = published.roster;
            }

            let output = match CsvReportRenderer::new(&out)
                .render(&RosterReport::build(&roster))
                .context("rendering roster report")
            {
                Ok(path) => path,
                Err(err) => {
                    if stored.is_some() {
                        let rollback = match &previous {
                            Some(p) => store.save(p, true).map(|_| ()),
                            None => store.remove(month),
                        };
                        if let Err(e) = rollback {
                            tracing::warn!(%month, error = %format!("{e:#}"), "store rollback failed");
                        }
                    }
                    return Err(err);
                }
            };

            println!(
                "{}",
                json!({
                    "success": true,
                    "output": output,
                    "stored": stored,
                    "employees": roster.employees.len(),
                    "vacation": roster.vacation.len(),
                    "violations": roster.runs.violations.len(),
                    "shortfalls": roster.shortfalls.len(),
                    "warnings": roster.warnings,
                })
            );
            Ok(0)
        }
        Commands::Bidding { args } => {
            let lines = BiddingRequest::from_args(args.as_slice()).and_then(bidding::bidding_feed);
            match lines {
                Ok(lines) => {
                    println!("{}", serde_json::to_string(&lines)?);
                    Ok(0)
                }
                Err(err) => {
                    println!("{}", bidding::error_json(&err));
                    Ok(1)
                }
            }
        }
        Commands::Check {
            year,
            month,
            config,
        } => {
            let month = Month::new(year, month)?;
            let store = JsonRosterStore::open(&cli.store)?;
            let mut published = store.load(month)?;
            // Options de la génération, sauf fichier explicite.
            let opts = match config {
                Some(path) => RosterOptions::from_file(&path)?,
                None => published.options.clone(),
            };
            published.roster.reanalyze(&opts);
            let roster = &published.roster;
            println!(
                "{}",
                json!({
                    "period": published.period,
                    "violations": roster.runs.violations,
                    "shortfalls": roster.shortfalls,
                })
            );
            // Code 2 = WARNING/INCOMPLETE
            if roster.runs.violations.is_empty() && roster.shortfalls.is_empty() {
                Ok(0)
            } else {
                Ok(2)
            }
        }
        Commands::List => {
            let store = JsonRosterStore::open(&cli.store)?;
            let periods = store.list()?;
            println!("{}", json!({ "count": periods.len(), "rosters": periods }));
            Ok(0)
        }
    }
}
