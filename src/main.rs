use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use wifi_mode::{
    config::{self, Config},
    ApProvisioner, InterfaceInfo, LocalFs, ModeClassification, ModeDetector, SystemRunner,
};

#[derive(Parser)]
#[command(name = "wifi-mode")]
#[command(about = "Detect client/access-point mode on a WiFi interface and enable access-point mode")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what the interface probes report
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show whether the interface is a client, an access point, or neither
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the access point config files
    EnableAp {
        /// Write files under this root instead of the configured one
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Confirm the access point settings and write the files
        #[arg(short, long)]
        yes: bool,
    },

    /// Switch back from access point to client mode
    DisableAp,

    /// Show the effective configuration
    ShowConfig,

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::InitConfig { force } = cli.command {
        return cmd_init_config(cli.config.as_deref(), force);
    }

    let cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info { json } => cmd_info(&cfg, json),
        Commands::Status { json } => cmd_status(&cfg, json),
        Commands::EnableAp { root, yes } => cmd_enable_ap(&cfg, root, yes),
        Commands::DisableAp => cmd_disable_ap(&cfg),
        Commands::ShowConfig => cmd_show_config(&cfg, cli.config.as_deref()),
        Commands::InitConfig { .. } => unreachable!("handled before loading config"),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
}

fn detector(cfg: &Config) -> ModeDetector<SystemRunner> {
    ModeDetector::new(SystemRunner::new(cfg.probe_timeout()), &cfg.wifi_interface)
}

fn cmd_info(cfg: &Config, json: bool) -> Result<()> {
    let info = detector(cfg).get_info()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        display_info(&cfg.wifi_interface, &info);
    }

    Ok(())
}

fn display_info(interface: &str, info: &InterfaceInfo) {
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "(unknown)".to_string());

    println!("Interface:    {}", interface);
    println!("HW address:   {}", show(&info.hardware_address));
    println!("Inet address: {}", show(&info.inet_address));
    println!("AP address:   {}", show(&info.access_point_address));
    println!("AP SSID:      {}", show(&info.access_point_ssid));
}

fn cmd_status(cfg: &Config, json: bool) -> Result<()> {
    let mode = detector(cfg).mode()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&mode)?);
        return Ok(());
    }

    match mode {
        ModeClassification::ClientConnected(addr) => {
            println!("{}: connected as client ({})", cfg.wifi_interface, addr)
        }
        ModeClassification::AccessPointEnabled(addr) => {
            println!("{}: access point enabled ({})", cfg.wifi_interface, addr)
        }
        ModeClassification::Disabled => println!("{}: disabled", cfg.wifi_interface),
    }

    Ok(())
}

fn cmd_enable_ap(cfg: &Config, root: Option<PathBuf>, yes: bool) -> Result<()> {
    let context = cfg.provisioning_context();
    let mut layout = cfg.layout();
    if let Some(root) = root {
        layout.root_dir = root;
    }

    println!("Access point settings:");
    for (key, value) in context.values() {
        let shown = if key == "passphrase" {
            "*".repeat(value.as_str().map_or(0, |s| s.len()).min(12))
        } else {
            value
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| value.to_string())
        };
        println!("  {:<20} {}", key, shown);
    }
    println!();
    println!("Templates: {}", layout.assets_dir.display());
    println!("Root:      {}", layout.root_dir.display());

    if !yes {
        println!();
        println!("Re-run with --yes to write the access point config.");
        return Ok(());
    }

    let detector = detector(cfg);
    let provisioner = ApProvisioner::new(&detector, LocalFs, layout);
    provisioner.enable_access_point(&context)?;

    println!("Access point config written. Restart networking to apply.");
    Ok(())
}

fn cmd_disable_ap(cfg: &Config) -> Result<()> {
    let detector = detector(cfg);
    let provisioner = ApProvisioner::new(&detector, LocalFs, cfg.layout());
    provisioner.disable_access_point()?;
    Ok(())
}

fn cmd_show_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("Config file: {}", path.display());
    println!();
    print!("{}", toml::to_string_pretty(cfg)?);

    Ok(())
}

fn cmd_init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());

    Ok(())
}
