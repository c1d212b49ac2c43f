use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use pension_cli::{app, config::AppConfig, form::InputForm, logging};
use pension_core::CalculationStore;
use pension_core::store::StoreConfig;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Net pension projection for early retirement in the German statutory
/// pension system.
///
/// Projects gross pension, health and care contributions, income tax and
/// net pension for retiring 0 to 48 months early.
#[derive(Debug, Parser)]
#[command(name = "pension-projection", version)]
struct Cli {
    /// TOML file with parameter, store and logging settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store backend to use: `sqlite` (default) or `memory`.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Store connection string.
    /// For SQLite this is a file path (default `pension.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log filter, e.g. `debug` or `pension_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project every early-retirement scenario.
    Calculate(CalculateArgs),
    /// Show the stored last calculation.
    Last,
    /// Delete the stored last calculation.
    Clear,
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Date of birth, `YYYY-MM-DD` or `DD.MM.YYYY`.
    #[arg(long)]
    birthday: String,

    /// Expected gross monthly pension at the regular retirement age, in EUR.
    #[arg(long, allow_hyphen_values = true)]
    expected_pension: String,

    /// Monthly pension entitlement accrued so far, in EUR.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    entitlement: String,

    /// Date of the pension statement the entitlement is taken from.
    #[arg(long)]
    statement_date: String,

    /// Reduced long-term care rate for parents.
    #[arg(long)]
    children: bool,

    /// Church tax as a fraction of income tax, e.g. `0.09`.
    #[arg(long, conflicts_with = "state")]
    church_tax_rate: Option<String>,

    /// Federal state whose church tax rate applies, e.g. `Bayern`.
    #[arg(long)]
    state: Option<String>,

    /// Store this calculation as the last one.
    #[arg(long)]
    save: bool,
}

impl From<CalculateArgs> for InputForm {
    fn from(args: CalculateArgs) -> Self {
        InputForm {
            birthday: args.birthday,
            expected_pension: args.expected_pension,
            current_pension_entitlement: args.entitlement,
            statement_date: args.statement_date,
            has_children: args.children,
            church_tax_rate: args.church_tax_rate,
            federal_state: args.state,
        }
    }
}

// ─── store ───────────────────────────────────────────────────────────────────

/// Command line wins over the config file, which wins over the defaults.
fn store_config(
    cli: &Cli,
    config: &AppConfig,
) -> StoreConfig {
    StoreConfig::default()
        .with_overrides(
            config.store.backend.as_deref(),
            config.store.connection_string.as_deref(),
        )
        .with_overrides(cli.backend.as_deref(), cli.db.as_deref())
}

async fn open_store(store_config: &StoreConfig) -> anyhow::Result<Box<dyn CalculationStore>> {
    Ok(app::build_registry().create(store_config).await?)
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_optional(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().or(config.logging.level.as_deref());
    let log_file = cli.log_file.as_deref().or(config.logging.file.as_deref());
    let _logging = logging::init_logging(level, log_file)?;

    let store_config = store_config(&cli, &config);

    let output = match cli.command {
        Command::Calculate(args) => {
            let save = args.save;
            let form = InputForm::from(args);
            let store = if save {
                Some(open_store(&store_config).await?)
            } else {
                None
            };
            app::calculate(&form, config.parameters, store.as_deref()).await?
        }
        Command::Last => app::show_last(&*open_store(&store_config).await?).await?,
        Command::Clear => app::clear(&*open_store(&store_config).await?).await?,
    };

    print!("{output}");
    Ok(())
}
