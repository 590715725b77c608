// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::time::Duration;

use anyhow::Result;
use awakening::config::{validate_config, PageFile};
use awakening::page::{Page, PageEvent};
use awakening::playback::AutoplayGate;
use awakening::triggers::Viewport;
use tracing::info;

/// Pixels scrolled per simulation step
const SCROLL_STEP: f64 = 120.0;
/// Delay between simulation steps
const STEP_DELAY: Duration = Duration::from_millis(40);

fn print_usage() {
    println!("AWAKENING - Scroll-triggered album player");
    println!();
    println!("Usage: awakening [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list-tracks [CONFIG]           List the playlist");
    println!("  --debug-info [CONFIG]            Print the player debug snapshot");
    println!("  --simulate [CONFIG] [--no-click] Scroll through the page once");
    println!("  --validate <CONFIG>              Check a page configuration");
    println!("  --write-config <PATH>            Write the default page configuration");
    println!("  --help                           Show this help message");
}

fn load_config(path: Option<&String>) -> Result<PageFile> {
    match path {
        Some(path) => validate_config(path),
        None => Ok(PageFile::default()),
    }
}

fn list_tracks(config: &PageFile) {
    println!("{}", config.page.title);
    println!();
    for (i, track) in config.tracks.iter().enumerate() {
        println!(
            "{:>2}. {:<8} {} ({:.0}s)",
            i + 1,
            track.id.as_str(),
            track.title,
            track.duration_secs
        );
    }
}

async fn simulate(config: &PageFile, click_first: bool) -> Result<()> {
    let page = Page::from_config(config, AutoplayGate::new());
    let handle = page.handle();
    let runner = tokio::spawn(page.run());

    if click_first {
        handle.send(PageEvent::UserInteraction);
    }

    let viewport = Viewport::new(0.0, config.page.viewport_height);
    let bottom = (config.page_height() - viewport.height).max(0.0);
    let mut top = 0.0;
    loop {
        handle.send(PageEvent::Scrolled(viewport.scrolled_to(top)));
        if top >= bottom {
            break;
        }
        top = (top + SCROLL_STEP).min(bottom);
        tokio::time::sleep(STEP_DELAY).await;
    }

    // Let the last start request settle
    tokio::time::sleep(config.page.latency() + STEP_DELAY).await;
    handle.send(PageEvent::Shutdown);

    let page = runner.await?;
    info!(
        "Scrolled {:.0}px, {} of {} trigger regions fired",
        bottom,
        page.dispatcher().triggered_count(),
        page.dispatcher().trigger_count()
    );
    println!("{}", page.debug_info());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("AWAKENING - Scroll-triggered album player");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--list-tracks" => {
            let config = load_config(args.get(2))?;
            list_tracks(&config);
        }
        "--debug-info" => {
            let config = load_config(args.get(2))?;
            let page = Page::from_config(&config, AutoplayGate::new());
            println!("{}", page.debug_info());
        }
        "--simulate" => {
            let rest = &args[2..];
            let click_first = !rest.iter().any(|a| a == "--no-click");
            let config = load_config(rest.iter().find(|a| !a.starts_with("--")))?;
            simulate(&config, click_first).await?;
        }
        "--validate" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: --validate requires a config path");
                std::process::exit(1);
            };
            let config = validate_config(path)?;
            println!(
                "{}: {} tracks, {} regions - OK",
                path,
                config.tracks.len(),
                config.regions.len()
            );
        }
        "--write-config" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: --write-config requires a path");
                std::process::exit(1);
            };
            PageFile::default().save(path)?;
            println!("Wrote default page configuration to {}", path);
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
