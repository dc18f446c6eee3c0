//! `scout` - drive the ground-control dashboard from a terminal.
//!
//! Usage:
//!   scout command arm
//!   scout upload field1.kml field2.kml --param flight_altitude=40
//!   scout telemetry --seconds 30

use anyhow::Result;
use clap::{Parser, Subcommand};
use scout_console::{load_kml_files, Config, Dashboard};
use scout_core::{DroneCommand, TerminalLog};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scout drone ground-control console")]
struct Args {
    /// Control API base URL (overrides SCOUT_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Rosbridge WebSocket URL (overrides SCOUT_ROSBRIDGE_URL)
    #[arg(long)]
    rosbridge_url: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Send a flight-control command (arm, disarm, rtl, land, mission-start)
    Command { command: DroneCommand },

    /// Mission controls
    Mission {
        #[command(subcommand)]
        action: MissionAction,
    },

    /// Upload KML geometry and request waypoints for every file
    Upload {
        files: Vec<PathBuf>,

        /// Treat the files as dropped: non-.kml names are discarded
        #[arg(long = "drop")]
        dropped: bool,

        /// Flight parameter override, e.g. `flight_altitude=40`
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        #[arg(long)]
        no_optimize_angle: bool,
    },

    /// List detection crops
    Detections {
        /// Also fetch each card's detection details
        #[arg(long)]
        info: bool,
    },

    /// AI pipeline
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },

    /// Post a directive to the map surface
    Map {
        #[command(subcommand)]
        action: MapAction,
    },

    /// Watch battery and flight mode
    Telemetry {
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
}

#[derive(Subcommand, Debug)]
enum MissionAction {
    Start,
}

#[derive(Subcommand, Debug)]
enum AiAction {
    Run,
    Reload,
}

#[derive(Subcommand, Debug)]
enum MapAction {
    ShowAll,
    CenterView,
}

/// Print the log, from its banner on, until the last log handle drops.
fn stream_log(log: &TerminalLog) -> JoinHandle<()> {
    let mut tail = log.tail();
    tokio::spawn(async move {
        while let Some(entry) = tail.next().await {
            println!("{}", entry.line);
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("scout_console=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(url) = args.rosbridge_url {
        config.telemetry.url = url;
    }
    tracing::debug!(api = %config.api_url, telemetry = %config.telemetry.url, "Configured");

    let mut dashboard = Dashboard::new(&config);
    let printer = stream_log(&dashboard.log);

    match args.action {
        Action::Command { command } => {
            dashboard.commands.send(command).await?;
        }
        Action::Mission { action: MissionAction::Start } => {
            dashboard.commands.start_mission().await;
        }
        Action::Upload {
            files,
            dropped,
            params,
            no_optimize_angle,
        } => {
            let files = load_kml_files(&files).await?;
            let mut flight_params = dashboard.state.read(|s| s.flight_params.clone());
            for assignment in &params {
                flight_params.apply_assignment(assignment)?;
            }
            if no_optimize_angle {
                flight_params.set_optimize_angle(false);
            }

            dashboard.state.update(|s| {
                s.open_upload_modal();
                s.flight_params = flight_params;
                if dropped {
                    s.select_from_drop(files);
                } else {
                    s.select_from_picker(files);
                }
            });
            let selected = dashboard.state.read(|s| s.upload_message.clone());
            if !selected.is_empty() {
                println!("{}", selected);
            }
            dashboard.upload_selected().await;
        }
        Action::Detections { info } => {
            if let Some(names) = dashboard.gallery.refresh().await {
                for name in &names {
                    println!("{}", dashboard.client.image_url(name));
                    if info {
                        let view = dashboard.gallery.inspect(name).await;
                        for line in view.render().lines() {
                            println!("    {}", line);
                        }
                    }
                }
            }
        }
        Action::Ai { action: AiAction::Run } => {
            if let Some(refresh) = dashboard.gallery.run_ai_script().await {
                refresh.await?;
                let count = dashboard.state.read(|s| s.images.len());
                println!("{} detection image(s) available.", count);
            }
        }
        Action::Ai { action: AiAction::Reload } => {
            dashboard.gallery.reload_data().await;
        }
        Action::Map { action } => {
            let mut surface = dashboard.map.attach();
            match action {
                MapAction::ShowAll => dashboard.map.show_all(),
                MapAction::CenterView => dashboard.map.center_view(),
            };
            if let Some(directive) = surface.try_next() {
                println!("{} <- {}", dashboard.map.map_url(), serde_json::to_string(&directive)?);
            }
        }
        Action::Telemetry { seconds } => {
            let mut snapshots = dashboard.mount_telemetry().await;
            let deadline = tokio::time::sleep(Duration::from_secs(seconds));
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = snapshots.borrow_and_update().clone();
                        println!(
                            "[{:?}] mode {} battery {}",
                            snapshot.link,
                            snapshot.mode_display(),
                            snapshot.battery_display()
                        );
                    }
                }
            }
            dashboard.shutdown().await;
        }
    }

    drop(dashboard);
    printer.await?;
    Ok(())
}
