//! netcap transport report
//!
//! Probes every backend once and prints what the process can use:
//!   Part A: one capability record per backend
//!   Part B: the preferred transport, with a 4-thread event loop group
//!
//! Run: ./target/release/netcap-report
//! Env: NETCAP_TRANSPORT_TYPE=io_uring opts io_uring into probing,
//!      RUST_LOG=debug shows each probe step.

use std::error::Error;
use std::sync::Arc;

use netcap::{
    CapabilityRecord, DefaultThreadFactory, TransportConfig, TransportError, TransportRegistry, TypeHandle,
    VersionReport,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LINE: &str = "────────────────────────────────────────────────────────────";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn section(name: &str) {
    println!("\n{}", LINE);
    println!("  {}", name);
    println!("{}", LINE);
}

fn row(label: &str, value: Result<&TypeHandle, TransportError>) {
    match value {
        Ok(handle) => println!("    {:<24} {}", label, handle),
        Err(TransportError::Unsupported { .. }) => println!("    {:<24} -", label),
        Err(e) => println!("    {:<24} error: {}", label, e),
    }
}

fn print_record(record: &CapabilityRecord) {
    match record.unavailability_cause() {
        None => {
            println!(
                "  {:<10} available  (domain sockets: {})",
                record.name(),
                if record.supports_domain_sockets() { "yes" } else { "no" }
            );
            row("server channel", record.server_channel_type());
            row("socket channel", record.socket_channel_type());
            row("domain server channel", record.domain_server_channel_type());
            row("domain socket channel", record.domain_socket_channel_type());
            row("datagram channel", record.datagram_channel_type());
            row("event loop group", record.event_loop_group_type());
            row("event loop", record.event_loop_type());
        }
        Some(cause) => {
            println!("  {:<10} unavailable: {}", record.name(), cause);
            let mut source = cause.source();
            while let Some(inner) = source {
                println!("    caused by: {}", inner);
                source = inner.source();
            }
        }
    }
}

fn main() {
    init_tracing();

    let config = TransportConfig::from_env();
    println!("=== netcap transport report (v{}) ===", netcap::VERSION);
    println!(
        "    transport type: {}",
        config.transport_type.as_deref().unwrap_or("(not set)")
    );

    let registry = TransportRegistry::builder(config).build();
    match registry.version_report() {
        Some(VersionReport::Consistent(v)) => println!("    versions: consistent ({})", v),
        Some(VersionReport::Unknown) => println!("    versions: unknown"),
        Some(VersionReport::Inconsistent { versions, .. }) => {
            println!("    versions: INCONSISTENT ({})", versions.join(", "))
        }
        None => println!("    versions: check disabled"),
    }

    // Part A
    section("Part A: Capability records");
    let mut available = 0;
    for record in registry.records() {
        print_record(record);
        if record.is_available() {
            available += 1;
        }
    }
    println!("\n  {} of {} backends available", available, netcap::TransportKind::ALL.len());

    // Part B
    section("Part B: Preferred transport");
    let preferred = registry.preferred();
    println!("  using {}", preferred.name());

    let factory = Arc::new(DefaultThreadFactory::new(preferred.name().to_lowercase()));
    let failed = match preferred.new_event_loop_group(4, factory) {
        Ok(group) => {
            println!(
                "  event loop group: {} loops on {}, next loop #{}",
                group.thread_count(),
                group.transport(),
                group.next().index()
            );
            group.shutdown();
            false
        }
        Err(e) => {
            println!("  event loop group: FAILED: {}", e);
            true
        }
    };

    println!("\n{}", LINE);
    std::process::exit(if failed { 1 } else { 0 });
}
