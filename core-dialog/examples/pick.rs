//! Native dialog demonstration
//!
//! Opens one dialog against the installed `nfd` library and prints the result.
//!
//! Run with:
//! ```bash
//! # Single file with an image filter
//! cargo run --example pick -- open
//!
//! # Multi-select, save and folder picker
//! cargo run --example pick -- open-many
//! cargo run --example pick -- save
//! cargo run --example pick -- folder
//!
//! # Explicit library location
//! NFD_LIBRARY=/opt/nfd/lib/libnfd.so cargo run --example pick -- folder
//! ```

use anyhow::Context;
use bridge_traits::log::LogLevel;
use core_dialog::{DialogInvoker, DialogOutcome, DialogRequest};
use core_runtime::config::DialogConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use std::env;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default().with_level(LogLevel::Debug))?;

    let mode = env::args().nth(1).unwrap_or_else(|| "open".to_string());
    let home = env::var("HOME").or_else(|_| env::var("USERPROFILE")).ok();

    let request = match mode.as_str() {
        "open" => DialogRequest::open_file()
            .with_filter("Images", "png,jpg,jpeg")
            .with_filter("Text", "txt,md"),
        "open-many" => DialogRequest::open_files().with_filter("Any text", "*.txt; *.md"),
        "save" => DialogRequest::save_file()
            .with_default_name("untitled.txt")
            .with_filter("Text", "txt"),
        "folder" => DialogRequest::pick_folder(),
        other => anyhow::bail!(
            "unknown mode '{}', expected open, open-many, save or folder",
            other
        ),
    };
    let request = match home {
        Some(home) => request.with_default_path(home),
        None => request,
    };

    let mut builder = DialogConfig::builder();
    if let Ok(path) = env::var("NFD_LIBRARY") {
        builder = builder.library_path(path);
    }
    let config = builder
        .build()
        .context("could not load the nfd shared library")?;

    let invoker = DialogInvoker::new(config)?;
    info!(?invoker, mode = %mode, "Showing dialog");

    match invoker.run(&request)? {
        DialogOutcome::Selected(path) => println!("{}", path.display()),
        DialogOutcome::SelectedMany(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
        }
        DialogOutcome::Cancelled => println!("(cancelled)"),
    }

    Ok(())
}
