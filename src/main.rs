//! capinspect - print OpenCL platform and device capabilities
//!
//! Lists every OpenCL platform on the machine and the properties of each of
//! its devices, one tab-separated line per property.

use anyhow::{Context, Result, anyhow};
use capinspect::DeviceClass;
use capinspect::inspector::{Inspector, PropertyKey, Scope};
use capinspect::opencl::OpenClProvider;
use capinspect::report::{self, ErrorPolicy, ReportConfig};
use clap::Parser;
use std::io::{self, Write};

/// Command line arguments for capinspect
#[derive(Parser, Debug)]
#[clap(
    name = "capinspect",
    about = "Query and print OpenCL platform and device capabilities.",
    version
)]
struct Args {
    /// Only list this platform index
    #[clap(short, long)]
    platform: Option<usize>,

    /// Only list this device index within each listed platform
    #[clap(short, long)]
    device: Option<usize>,

    /// Device type to enumerate (all, cpu, gpu, accelerator, default)
    #[clap(short = 't', long, value_parser = parse_device_class, default_value = "all")]
    device_type: DeviceClass,

    /// What to do when a property query fails (abort or skip)
    #[clap(long, value_parser = parse_error_policy, default_value = "skip")]
    on_error: ErrorPolicy,

    /// Properties to print instead of the defaults, e.g. CL_DEVICE_NAME,CL_DEVICE_TYPE
    #[clap(short, long, value_delimiter = ',', value_parser = parse_property_key)]
    keys: Vec<PropertyKey>,

    /// Enable verbose logging
    #[clap(short, long)]
    verbose: bool,
}

/// Parses a device type name.
pub(crate) fn parse_device_class(s: &str) -> Result<DeviceClass> {
    s.parse::<DeviceClass>().map_err(|e| anyhow!(e))
}

pub(crate) fn parse_error_policy(s: &str) -> Result<ErrorPolicy> {
    s.parse::<ErrorPolicy>().map_err(|e| anyhow!(e))
}

/// Parses a property name such as `CL_DEVICE_NAME` or `device_name`.
pub(crate) fn parse_property_key(s: &str) -> Result<PropertyKey> {
    PropertyKey::from_name(s).with_context(|| format!("Unknown property: '{}'", s))
}

fn build_config(args: &Args) -> ReportConfig {
    let mut config = ReportConfig {
        platform: args.platform,
        device: args.device,
        device_class: args.device_type,
        policy: args.on_error,
        ..ReportConfig::default()
    };

    if !args.keys.is_empty() {
        let (platform_keys, device_keys): (Vec<_>, Vec<_>) = args
            .keys
            .iter()
            .copied()
            .partition(|key| key.scope() == Scope::Platform);
        config.platform_keys = platform_keys;
        config.device_keys = device_keys;
    }
    config
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = build_config(&args);
    log::debug!(
        "Listing {} devices, on error: {}, {} platform / {} device properties",
        config.device_class,
        config.policy,
        config.platform_keys.len(),
        config.device_keys.len()
    );

    let inspector = Inspector::new(OpenClProvider::new());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_report(&inspector, &config, &mut out)
        .context("Failed to list OpenCL platforms and devices")?;
    out.flush()?;

    Ok(())
}
