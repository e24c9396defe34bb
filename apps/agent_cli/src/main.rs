use std::{
    fs,
    path::{Path, PathBuf},
};

use agent_core::{
    load_config, CatalogSource, Control, FlowCommand, FlowStep, JsonFileCatalog, MeAgent,
    StaticCatalog,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use shared::protocol::{OfferDetail, RewardBalance, SwapAmountResponse};
use tracing_subscriber::EnvFilter;

mod host;

use host::CommandQueue;

#[derive(Parser, Debug)]
#[command(name = "me-agent", about = "Render me-agent widget views from JSON fixtures")]
struct Cli {
    /// TOML config file; defaults to ./me-agent.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON catalog snapshot (brands, categories, offers, products).
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long)]
    partner_id: Option<String>,
    #[arg(long)]
    callback_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a redemption flow and replay clicks against it.
    Redeem {
        #[arg(long)]
        reward: PathBuf,
        #[arg(long)]
        swap: PathBuf,
        #[arg(long)]
        offer: Option<PathBuf>,
        #[arg(long = "click", value_enum)]
        clicks: Vec<ClickArg>,
    },
    Brands,
    Categories,
    Offers,
    Products,
    Preview,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClickArg {
    Back,
    Close,
    Confirm,
}

impl From<ClickArg> for Control {
    fn from(value: ClickArg) -> Self {
        match value {
            ClickArg::Back => Control::Back,
            ClickArg::Close => Control::Close,
            ClickArg::Confirm => Control::Confirm,
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(partner_id) = cli.partner_id {
        config.partner_id = partner_id;
    }
    if let Some(callback_url) = cli.callback_url {
        config.callback_url = callback_url;
    }

    let source: Box<dyn CatalogSource> = match &cli.catalog {
        Some(path) => Box::new(JsonFileCatalog::new(path)),
        None => Box::new(StaticCatalog::default()),
    };
    let mut agent = MeAgent::start(config, source.as_ref()).await?;

    match cli.command {
        Command::Redeem {
            reward,
            swap,
            offer,
            clicks,
        } => {
            let reward: RewardBalance = read_json(&reward)?;
            let swap: SwapAmountResponse = read_json(&swap)?;
            let offer: Option<OfferDetail> = offer
                .as_deref()
                .map(read_json::<OfferDetail>)
                .transpose()?;
            run_redemption(&mut agent, &reward, &swap, offer.as_ref(), &clicks)?;
        }
        Command::Brands => println!("{}", agent.render_brands()?),
        Command::Categories => println!("{}", agent.render_categories()?),
        Command::Offers => println!("{}", agent.render_offers()?),
        Command::Products => println!("{}", agent.render_products()?),
        Command::Preview => {
            let node = agent.mount_offer_preview(|| println!("-> view offers requested"))?;
            println!("{}", agent.markup(node)?);
        }
    }

    agent.destroy();
    Ok(())
}

fn run_redemption(
    agent: &mut MeAgent,
    reward: &RewardBalance,
    swap: &SwapAmountResponse,
    offer: Option<&OfferDetail>,
    clicks: &[ClickArg],
) -> Result<()> {
    let node = agent.open_redemption(reward, swap, offer)?;
    let queue = CommandQueue::default();
    agent.attach_redemption(node, queue.callbacks())?;

    let state = agent.flow_state(node)?;
    let mut step = FlowStep::Start.apply(FlowCommand::Open {
        affordable: state.is_affordable(),
    })?;
    if let Some(needed) = state.amount_needed() {
        println!("step={step} amount_needed={}", reward.units(needed));
    } else {
        println!("step={step}");
    }
    println!("{}", agent.markup(node)?);

    for click in clicks {
        let control = Control::from(*click);
        let handled = agent.click(node, control)?;
        let (next, applied) = queue.drain_into(step)?;
        step = next;
        println!("click={control} handled={handled} applied={applied:?} step={step}");
        if step.is_terminal() {
            agent.unmount(node)?;
            break;
        }
    }
    Ok(())
}
