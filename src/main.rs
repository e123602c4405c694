// ports - Command-line console for the port smart-contract network

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use portchain::api::{HttpDirectoryClient, HttpNodeConnector};
use portchain::controller::{can_fulfill, ConsoleError, LedgerConsole, NodeView};
use portchain::model::{parse_cost, PortRegistration};
use portchain::session::SessionStore;

#[derive(Parser)]
#[command(name = "ports", version, about = "Console client for the port smart-contract network")]
struct Cli {
    /// Master directory service address
    #[arg(long, default_value = "http://localhost:5000")]
    master: String,

    /// Directory holding persisted session state
    #[arg(long, default_value = ".portchain")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all registered ports
    List,
    /// Show the network-wide contract log, newest first
    Contracts,
    /// Select the node all further commands route to
    Use { address: String },
    /// Show the active port and its contract feed
    Status,
    /// Create a contract from the active port
    Create {
        /// Destination port id
        #[arg(long)]
        to: String,
        /// Cost, a non-negative integer
        #[arg(long)]
        cost: String,
    },
    /// Ask the active node to mine a block
    Mine,
    /// Ask the active node to resolve conflicts with its peers
    Resolve,
    /// Fulfill a contract addressed to the active port
    Fulfill { uuid: Uuid },
    /// Register a new port with the directory
    Register {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ConsoleError> {
    let session = SessionStore::open(&cli.data_dir)?;
    let directory = HttpDirectoryClient::new(&cli.master)?;
    let nodes = HttpNodeConnector::new()?;
    let mut console = LedgerConsole::new(directory, nodes, session);

    match cli.command {
        Command::List => {
            for port in console.list_ports().await? {
                println!("{port}  {}", port.address);
            }
        }
        Command::Contracts => {
            for contract in console.latest_contracts().await? {
                println!(
                    "{}  {} -> {}  cost {}  {}",
                    contract.uuid,
                    contract.port_from,
                    contract.port_to,
                    contract.cost,
                    format_timestamp(contract.timestamp),
                );
            }
        }
        Command::Use { address } => {
            console.select_node(&address)?;
            println!("active node set to {address}");
            if let Some(help) = console.onboarding_help()? {
                println!("\n{help}");
            }
        }
        Command::Status => {
            let view = console.refresh().await?;
            render_view(&view);
        }
        Command::Create { to, cost } => {
            let cost = parse_cost(&cost)?;
            match console.create_contract(&to, cost).await? {
                Some(contract) => println!("contract {} submitted", contract.uuid),
                None => println!("contract submitted"),
            }
        }
        Command::Mine => {
            let view = console.mine().await?;
            println!("block mining requested");
            render_view(&view);
        }
        Command::Resolve => {
            let view = console.resolve().await?;
            println!("conflict resolution requested");
            render_view(&view);
        }
        Command::Fulfill { uuid } => {
            console.fulfill(&uuid).await?;
            println!("contract {uuid} fulfilled; mine or resolve to record settlement");
        }
        Command::Register { id, name, address } => {
            let registration = PortRegistration { id, name, address };
            console.register_port(&registration).await?;
            println!("port {} registered", registration.id);
        }
    }

    Ok(())
}

fn render_view(view: &NodeView) {
    println!(
        "port {}  balance {}  ({})",
        view.port, view.port.balance, view.port.address
    );

    if view.contracts.is_empty() {
        println!("no contracts on chain");
        return;
    }

    println!("contracts (newest block first):");
    for record in &view.contracts {
        let action = if can_fulfill(record, Some(&view.port)) {
            "  [fulfillable]"
        } else {
            ""
        };
        println!(
            "  {}  {} -> {}  cost {}  {}  {}{}",
            record.uuid,
            record.from_address,
            record.to_address,
            record.cost,
            record.status(),
            format_timestamp(record.timestamp),
            action,
        );
    }
}

fn format_timestamp(timestamp: i64) -> String {
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(moment) => moment.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}
