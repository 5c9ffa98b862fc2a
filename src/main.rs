use bizcard::config::{self, CONFIG_FILE};
use bizcard::delivery::{DirectoryTarget, deliver, save_normalized};
use bizcard::imaging::{ProfileName, RawImage, RustBackend, normalize};
use bizcard::naming::contact_file_name;
use bizcard::output::{self, NormalizeReport};
use bizcard::types::ContactRecord;
use bizcard::vcard;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Parser)]
#[command(name = "bizcard")]
#[command(about = "Prepare business-card assets and export contact cards")]
#[command(long_about = "\
Prepare business-card assets and export contact cards

Images are shrunk to fit a fixed profile and re-encoded as PNG:

  avatar   720x720, about 500KB
  logo     300x300, about 200KB

Cards are exported as vCard 3.0 from the card JSON returned by the API
(name, title, description, phone, email, website, city, avatar_link, socials).

Run 'bizcard gen-config' to generate a documented bizcard.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Output directory (overrides export.output_dir)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Shrink images to a profile and re-encode them as PNG
    Normalize {
        /// Size profile to apply
        #[arg(long, value_enum, default_value_t = ProfileName::Avatar)]
        profile: ProfileName,
        /// Images to normalize
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Export a card JSON file as a .vcf contact
    Vcard {
        /// Card JSON as returned by the card API
        card: PathBuf,
        /// Print the document instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Print a stock bizcard.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Normalize { profile, inputs } => {
            let (config, target) = load_context(&cli.config, cli.out_dir)?;
            let limit = config::effective_concurrency(&config.processing);
            let mut reports = normalize_all(profile, inputs, &config, limit).await?;

            save_normalized(&target, &mut reports);
            output::print_normalize_output(profile, &reports);

            if reports.iter().any(|r| r.result.is_err()) {
                return Err("some images could not be normalized".into());
            }
        }
        Command::Vcard { card, stdout } => {
            let json = std::fs::read_to_string(&card)?;
            let record: ContactRecord = serde_json::from_str(&json)?;
            if record.name.trim().is_empty() {
                return Err(format!("{}: card has no name", card.display()).into());
            }

            let document = vcard::export_vcard(&record);
            if stdout {
                print!("{}", document);
            } else {
                let (_, target) = load_context(&cli.config, cli.out_dir)?;
                let file_name = contact_file_name(&record.name);
                let dest = deliver(&target, &document, &file_name)?;
                output::print_export_output(&file_name, vcard::lines(&record).len(), &dest);
            }
        }
    }

    Ok(())
}

/// Load the config file and resolve where output goes.
fn load_context(
    config_path: &Path,
    out_dir: Option<PathBuf>,
) -> Result<(config::Config, DirectoryTarget), config::ConfigError> {
    let config = config::load_config(config_path)?;
    let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.export.output_dir));
    Ok((config, DirectoryTarget::new(out_dir)))
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.parse_default_env();
    if verbose {
        builder.filter_module("bizcard", LevelFilter::Debug);
    }
    builder.init();
}

/// Normalize every input concurrently, at most `limit` at a time.
///
/// Reports come back in input order.
async fn normalize_all(
    profile: ProfileName,
    inputs: Vec<PathBuf>,
    config: &config::Config,
    limit: usize,
) -> Result<Vec<NormalizeReport>, Box<dyn std::error::Error>> {
    let backend = Arc::new(RustBackend::new());
    let permits = Arc::new(Semaphore::new(limit.max(1)));
    let options = config.encode_options();
    let mut tasks = JoinSet::new();

    for (index, path) in inputs.into_iter().enumerate() {
        let backend = Arc::clone(&backend);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let input_size = tokio::fs::metadata(&path).await.ok().map(|m| m.len());
            let result = normalize(
                backend,
                RawImage::from_path(&path),
                profile.profile(),
                options,
            )
            .await;
            let report = NormalizeReport {
                input: path.display().to_string(),
                input_size,
                result: result.map_err(Into::into),
            };
            (index, report)
        });
    }

    let mut reports = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        reports.push(joined?);
    }
    reports.sort_by_key(|(index, _)| *index);
    Ok(reports.into_iter().map(|(_, report)| report).collect())
}
