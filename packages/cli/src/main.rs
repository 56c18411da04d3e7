#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for preparing and resolving bulk upload configs.
//!
//! Reference lists (service types, physical object types) are read from
//! JSON files exported from the Urban API. Log output is controlled with
//! `RUST_LOG`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use serde::Serialize;
use urban_loader_bulk::files::{
    resolve_physical_objects_config_file, resolve_upload_config_file,
    save_physical_objects_config, save_upload_config,
};
use urban_loader_bulk::plan::{
    plan_physical_object_uploads, plan_uploads, prepare_physical_objects_config,
    prepare_upload_config,
};
use urban_loader_bulk_models::CapacityKeying;

#[derive(Parser)]
#[command(name = "urban_loader", about = "Urban API bulk upload config tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config skeleton covering every `.geojson` file in a directory
    PrepareBulkConfig {
        /// Directory with services `GeoJSON` files
        #[arg(long, short = 'd')]
        directory: PathBuf,
        /// Path to save the config to (`.toml` or `.json`)
        #[arg(long, short = 'c')]
        config: PathBuf,
    },
    /// Replace type names in a services config with Urban API identifiers
    ResolveBulkConfig {
        /// Services bulk config (`.toml` or `.json`)
        #[arg(long, short = 'c')]
        config: PathBuf,
        /// JSON list of service types exported from the API
        #[arg(long)]
        service_types: PathBuf,
        /// JSON list of physical object types exported from the API
        #[arg(long)]
        physical_object_types: PathBuf,
        /// How `default_capacity` is assigned to files sharing a service type
        #[arg(
            long,
            default_value_t = CapacityKeying::ByServiceType,
            value_parser = parse_keying
        )]
        capacity_keying: CapacityKeying,
        /// Write the resolved config here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Replace type names in a physical objects config with identifiers
    ResolvePhysicalObjectsConfig {
        /// Physical objects bulk config (`.toml` or `.json`)
        #[arg(long, short = 'c')]
        config: PathBuf,
        /// JSON list of physical object types exported from the API
        #[arg(long)]
        physical_object_types: PathBuf,
        /// Write the resolved config here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Write a physical objects config skeleton for a directory
    PreparePhysicalObjectsConfig {
        /// Directory with physical objects `GeoJSON` files
        #[arg(long, short = 'd')]
        directory: PathBuf,
        /// Path to save the config to (`.toml` or `.json`)
        #[arg(long, short = 'c')]
        config: PathBuf,
    },
    /// Resolve a physical objects config and show which files would be uploaded
    PlanPhysicalObjectsUpload {
        /// Directory with physical objects `GeoJSON` files
        #[arg(long, short = 'd')]
        directory: PathBuf,
        /// Physical objects bulk config (`.toml` or `.json`)
        #[arg(long, short = 'c')]
        config: PathBuf,
        /// JSON list of physical object types exported from the API
        #[arg(long)]
        physical_object_types: PathBuf,
    },
    /// Resolve a services config and show which files would be uploaded
    PlanBulkUpload {
        /// Directory with services `GeoJSON` files
        #[arg(long, short = 'd')]
        directory: PathBuf,
        /// Services bulk config (`.toml` or `.json`)
        #[arg(long, short = 'c')]
        config: PathBuf,
        /// JSON list of service types exported from the API
        #[arg(long)]
        service_types: PathBuf,
        /// JSON list of physical object types exported from the API
        #[arg(long)]
        physical_object_types: PathBuf,
        /// How `default_capacity` is assigned to files sharing a service type
        #[arg(
            long,
            default_value_t = CapacityKeying::ByServiceType,
            value_parser = parse_keying
        )]
        capacity_keying: CapacityKeying,
    },
}

fn parse_keying(value: &str) -> Result<CapacityKeying, String> {
    CapacityKeying::from_str(value).map_err(|_| {
        format!("invalid capacity keying '{value}': expected by_service_type or by_filename")
    })
}

fn write_json<T: Serialize>(
    value: &T,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::PrepareBulkConfig { directory, config } => {
            let prepared = prepare_upload_config(&directory)?;
            save_upload_config(&config, &prepared)?;
            println!(
                "Wrote {} entries to {}; fill in service_type, physical_object_type \
                 and default_capacity before resolving.",
                prepared.len(),
                config.display()
            );
        }
        Commands::ResolveBulkConfig {
            config,
            service_types,
            physical_object_types,
            capacity_keying,
            output,
        } => {
            let resolved = resolve_upload_config_file(
                &config,
                &service_types,
                &physical_object_types,
                capacity_keying,
            )?;
            write_json(&resolved, output.as_deref())?;
        }
        Commands::ResolvePhysicalObjectsConfig {
            config,
            physical_object_types,
            output,
        } => {
            let resolved =
                resolve_physical_objects_config_file(&config, &physical_object_types)?;
            write_json(&resolved, output.as_deref())?;
        }
        Commands::PreparePhysicalObjectsConfig { directory, config } => {
            let prepared = prepare_physical_objects_config(&directory)?;
            save_physical_objects_config(&config, &prepared)?;
            println!(
                "Wrote {} entries to {}; replace each physical object type before resolving.",
                prepared.filenames.len(),
                config.display()
            );
        }
        Commands::PlanPhysicalObjectsUpload {
            directory,
            config,
            physical_object_types,
        } => {
            let resolved =
                resolve_physical_objects_config_file(&config, &physical_object_types)?;
            let plan = plan_physical_object_uploads(&directory, &resolved)?;

            println!("{:<40} {:>20}", "FILE", "PHYSICAL OBJECT TYPE");
            println!("{}", "-".repeat(61));
            for upload in &plan.uploads {
                println!("{:<40} {:>20}", upload.filename, upload.config);
            }
            println!();
            println!(
                "{} to upload, {} skipped, {} configured but missing",
                plan.uploads.len(),
                plan.skipped.len(),
                plan.missing_files.len()
            );
        }
        Commands::PlanBulkUpload {
            directory,
            config,
            service_types,
            physical_object_types,
            capacity_keying,
        } => {
            let resolved = resolve_upload_config_file(
                &config,
                &service_types,
                &physical_object_types,
                capacity_keying,
            )?;
            let plan = plan_uploads(&directory, &resolved)?;

            println!(
                "{:<40} {:>12} {:>20} {:>9}",
                "FILE", "SERVICE TYPE", "PHYSICAL OBJECT TYPE", "CAPACITY"
            );
            println!("{}", "-".repeat(84));
            for upload in &plan.uploads {
                println!(
                    "{:<40} {:>12} {:>20} {:>9}",
                    upload.filename,
                    upload.config.service_type_id,
                    upload.config.physical_object_type_id,
                    upload.config.default_capacity
                );
            }
            println!();
            println!(
                "{} to upload, {} skipped, {} configured but missing",
                plan.uploads.len(),
                plan.skipped.len(),
                plan.missing_files.len()
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
