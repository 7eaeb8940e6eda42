//! storeflow CLI
//!
//! Thin command-line front end over the library's resource managers:
//! parse arguments, build the right API client from environment
//! tokens, run one operation, print the resources.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use storeflow::api::EnvTokenProvider;
use storeflow::appstore::{
    AppStoreConnect, BetaGroupFilter, BuildFilter, CertificateFilter, CertificateType,
};
use storeflow::config::Config;
use storeflow::firebase::AppDistribution;
use storeflow::model::{ApiEnum, ApiResource, EnumParseOptions};

/// Environment variable holding the App Store Connect bearer token.
const ASC_TOKEN_VAR: &str = "STOREFLOW_ASC_TOKEN";
/// Environment variable holding the Firebase bearer token.
const FIREBASE_TOKEN_VAR: &str = "STOREFLOW_FIREBASE_TOKEN";

/// Mobile release workflows from the command line
#[derive(Parser, Debug)]
#[command(name = "storeflow", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List App Store Connect signing certificates
    Certificates {
        /// Restrict to one certificate type, e.g. IOS_DISTRIBUTION
        #[arg(long)]
        certificate_type: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// List App Store Connect builds
    Builds {
        /// App id to filter by (defaults to the saved one)
        #[arg(long)]
        app: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// List TestFlight beta groups
    BetaGroups {
        #[arg(long)]
        app: Option<String>,
    },
    /// List Firebase App Distribution releases
    Releases {
        /// Firebase project number (defaults to the saved one)
        #[arg(long)]
        project: Option<String>,
        /// Firebase app id (defaults to the saved one)
        #[arg(long)]
        app: Option<String>,
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) {
    let Some(tracing_level) = level.to_tracing_level() else {
        return;
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let mut config = Config::load();

    match args.command {
        Command::Certificates {
            certificate_type,
            limit,
        } => {
            // CLI values get strict validation so typos produce a
            // precise message instead of an empty listing.
            let parse_options = EnumParseOptions {
                humanize_names: true,
            };
            let certificate_type = certificate_type
                .map(|raw| CertificateType::parse_strict(&raw, &parse_options))
                .transpose()?;

            let api = AppStoreConnect::new(Arc::new(EnvTokenProvider::new(ASC_TOKEN_VAR)))?;
            let filter = CertificateFilter {
                certificate_type: certificate_type.map(|t| vec![t]),
                ..CertificateFilter::default()
            };
            let certificates = api
                .certificates()
                .list(&filter, None, Some(limit))
                .await
                .context("Failed to list certificates")?;
            for certificate in &certificates {
                println!("{}\n", certificate.display());
            }
            eprintln!("{} certificates", certificates.len());
        }
        Command::Builds { app, limit } => {
            let app = app.or_else(|| config.app_id.clone());
            let api = AppStoreConnect::new(Arc::new(EnvTokenProvider::new(ASC_TOKEN_VAR)))?;
            let filter = BuildFilter {
                app: app.clone(),
                ..BuildFilter::default()
            };
            let builds = api
                .builds()
                .list(&filter, None, Some(limit))
                .await
                .context("Failed to list builds")?;
            for build in &builds {
                println!("{}\n", build.display());
            }
            if let Some(app) = app {
                config.app_id = Some(app);
                config.save()?;
            }
        }
        Command::BetaGroups { app } => {
            let api = AppStoreConnect::new(Arc::new(EnvTokenProvider::new(ASC_TOKEN_VAR)))?;
            let filter = BetaGroupFilter {
                app: app.or_else(|| config.app_id.clone()),
                ..BetaGroupFilter::default()
            };
            let groups = api
                .beta_groups()
                .list(&filter, None)
                .await
                .context("Failed to list beta groups")?;
            for group in &groups {
                println!("{}\n", group.display());
            }
        }
        Command::Releases {
            project,
            app,
            limit,
        } => {
            let project = project
                .or_else(|| config.project_number.clone())
                .context("No Firebase project number given; pass --project once")?;
            let app = app
                .or_else(|| config.firebase_app_id.clone())
                .context("No Firebase app id given; pass --app once")?;

            let api = AppDistribution::new(Arc::new(EnvTokenProvider::new(FIREBASE_TOKEN_VAR)))?;
            let releases = api
                .releases(&project, &app)
                .list(25, Some(limit))
                .await
                .context("Failed to list releases")?;
            for release in &releases {
                println!("{}\n", release.display());
            }

            config.project_number = Some(project);
            config.firebase_app_id = Some(app);
            config.save()?;
        }
    }

    Ok(())
}
