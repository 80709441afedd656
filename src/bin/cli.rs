//! routegrid CLI
//!
//! Command-line front end for linking users to routes in a channel.

use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use routegrid::route::Unlinked;
use routegrid::{ChannelMap, Config, Datastore, ErrorKind, Repository, RouteIndex, RouteService, TxContext};
use tracing_subscriber::{fmt, EnvFilter};

/// routegrid CLI
#[derive(Parser, Debug)]
#[command(name = "routegrid-cli")]
#[command(about = "Link channel members to routes on a per-channel map")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./routegrid_data")]
    data_dir: String,

    /// Page cache size in MB
    #[arg(long, default_value = "16")]
    cache_mb: usize,

    /// Channel the command applies to
    #[arg(short, long, default_value = "default")]
    channel: String,

    /// User invoking the command
    #[arg(short = 'a', long = "as", default_value = "local")]
    actor: String,

    /// Whether the invoking user may act for others and change maps
    #[arg(long)]
    trusted: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Link yourself to a route
    Link {
        /// The section to link to
        section: u32,

        /// The path to link to
        path: String,

        /// Link this user instead of yourself
        #[arg(long)]
        user: Option<String>,
    },

    /// Unlink yourself from routes
    Unlink {
        /// Only unlink routes in this section
        section: Option<u32>,

        /// Only unlink routes on this path
        path: Option<String>,

        /// Unlink this user instead of yourself
        #[arg(long)]
        user: Option<String>,
    },

    /// Show who is linked to which route
    Show,

    /// Configure the channel's map, purging all routes
    Map {
        /// The number of sections the map has
        sections: u8,

        /// The max letter each section goes to, one per section
        max_paths: Vec<String>,
    },

    /// Remove every route linked in the channel
    Purge,

    /// Check the datastore responds
    Ping,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,routegrid=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match Config::builder().data_dir(&args.data_dir).cache_size_mb(args.cache_mb) {
        Ok(builder) => builder.build(),
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let start = Instant::now();
    let store = match Datastore::open(config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open datastore: {}", e);
            process::exit(1);
        }
    };
    let service = RouteService::new(Repository::new(store));

    if let Err(message) = run(&args, &service, start) {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn run(args: &Args, service: &RouteService, start: Instant) -> Result<(), String> {
    let ctx = TxContext::empty();
    let channel = args.channel.as_str();

    match &args.command {
        Commands::Link { section, path, user } => {
            let target = target_user(args, user.as_deref())?;
            let index = service
                .link_route(ctx, channel, target, *section, path)
                .map_err(describe)?;
            print_board(service, channel, &index)?;
        }
        Commands::Unlink { section, path, user } => {
            let target = target_user(args, user.as_deref())?;
            let Unlinked { removed, index } = service
                .unlink_route(ctx, channel, target, *section, path.as_deref())
                .map_err(describe)?;
            if target == args.actor {
                println!("Unlinked you from {} route(s)", removed.len());
            } else {
                println!("Unlinked user from {} route(s)", removed.len());
            }
            print_board(service, channel, &index)?;
        }
        Commands::Show => {
            let (map, index) = service.show(ctx, channel).map_err(describe)?;
            render(&map, &index);
        }
        Commands::Map { sections, max_paths } => {
            require_trusted(args)?;
            let map = ChannelMap::new(channel, *sections, max_paths.as_slice()).map_err(describe)?;
            service.reconfigure_map(ctx, &map).map_err(describe)?;
            println!("All routes have been purged and a new map has been saved for this channel");
        }
        Commands::Purge => {
            require_trusted(args)?;
            service.purge_channel(ctx, channel).map_err(describe)?;
            println!("All routes have been purged for this channel");
        }
        Commands::Ping => {
            let config = service.repository().store().config();
            println!(
                "Pong! {:?} (routegrid v{}, data in {})",
                start.elapsed(),
                routegrid::VERSION,
                config.data_dir.display()
            );
        }
    }

    Ok(())
}

/// The user a link/unlink applies to; acting for someone else needs trust
fn target_user<'a>(args: &'a Args, user: Option<&'a str>) -> Result<&'a str, String> {
    match user {
        Some(user) if user != args.actor => {
            require_trusted(args)?;
            Ok(user)
        }
        _ => Ok(args.actor.as_str()),
    }
}

fn require_trusted(args: &Args) -> Result<(), String> {
    if args.trusted {
        Ok(())
    } else {
        Err("You do not have permission to use this command".to_string())
    }
}

fn describe(e: routegrid::RouteError) -> String {
    match e.kind() {
        ErrorKind::Usage | ErrorKind::Conflict => e.to_string(),
        ErrorKind::System => {
            tracing::error!("{}", e);
            format!("Something went wrong: {}", e)
        }
    }
}

fn print_board(service: &RouteService, channel: &str, index: &RouteIndex) -> Result<(), String> {
    let map = service
        .repository()
        .get_map_for_channel(TxContext::empty(), channel)
        .map_err(describe)?;
    render(&map, index);
    Ok(())
}

fn render(map: &ChannelMap, index: &RouteIndex) {
    println!("Routes");
    for section in map.section_numbers() {
        println!();
        println!("Section {}", section);
        for path in map.paths(section) {
            println!("  {}: {}", path, index.users_at(section, path).join("/"));
        }
    }
}
