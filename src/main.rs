#[cfg(feature = "gui")]
mod app;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use prayer_times::{
    config::AppConfig,
    model::{Coordinates, Location},
    schedule::render_report,
    services::Services,
    state::{LOCATION_FAILED, SCHEDULE_FAILED},
    traits::{Clock, SystemClock},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[cfg(feature = "gui")]
use crate::app::{Message, PrayerTimesApp};

#[derive(Parser, Debug)]
#[command(name = "prayer-times")]
#[command(about = "Daily prayer times - desktop widget or terminal output")]
struct Args {
    /// Print today's schedule to the terminal instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Keep re-printing the schedule (headless only)
    #[arg(long, requires = "headless")]
    watch: bool,

    /// Use the best match for this city instead of detecting the position
    #[arg(long, requires = "headless", conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,

    /// Latitude to use instead of detecting the position
    #[arg(long, requires_all = ["headless", "lon"], allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude to use instead of detecting the position
    #[arg(long, requires_all = ["headless", "lat"], allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Extra configuration file, layered over the standard locations
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    #[cfg(feature = "gui")]
    let filter = if args.headless {
        EnvFilter::builder()
            .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
            .parse_lossy("prayer_times=debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
            .parse_lossy("prayer_times=debug,fontdb=error,wgpu=warn,naga=warn")
    };

    #[cfg(not(feature = "gui"))]
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy("prayer_times=debug");

    // Logs go to stderr so headless output stays pipeable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;
    let config = Arc::new(config);

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let services =
        Services::from_config(&config, clock).context("Failed to set up HTTP clients")?;

    if args.headless {
        run_headless(rt, config, services, &args)
    } else {
        #[cfg(feature = "gui")]
        {
            run_gui(rt, config, services)
        }
        #[cfg(not(feature = "gui"))]
        {
            anyhow::bail!("GUI mode not available. Build with --features gui or run with --headless")
        }
    }
}

/// Resolve the location from CLI overrides, falling back to detection.
async fn resolve_location(services: &Services, args: &Args) -> Result<Location> {
    if let Some(city) = &args.city {
        return services
            .locate_by_name(city)
            .await
            .with_context(|| format!("Could not find a location named {:?}", city));
    }

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        let coordinates = Coordinates::new(lat, lon)?;
        return services
            .location_from_coordinates(coordinates)
            .await
            .with_context(|| format!("Could not use coordinates {}", coordinates));
    }

    services
        .acquire_current_location()
        .await
        .context(LOCATION_FAILED)
}

/// Run in headless mode - print the schedule, optionally on every interval
fn run_headless(
    rt: tokio::runtime::Runtime,
    config: Arc<AppConfig>,
    services: Services,
    args: &Args,
) -> Result<()> {
    rt.block_on(async {
        tracing::info!("Starting prayer times in headless mode");

        let location = resolve_location(&services, args).await?;
        tracing::info!("Location: {} ({})", location.display_name, location.coordinates);

        let mut schedule = services
            .fetch_schedule(&location)
            .await
            .context(SCHEDULE_FAILED)?;
        print!("{}", render_report(&location, &schedule, services.now_local()));

        if !args.watch {
            return Ok(());
        }

        let interval_secs = config.refresh.classify_interval_secs;
        tracing::info!("Watching with interval: {} seconds", interval_secs);

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;

            let now = services.now_local();
            if now.date() != schedule.date {
                match services.fetch_schedule(&location).await {
                    Ok(fresh) => schedule = fresh,
                    Err(e) => tracing::error!("Failed to fetch the new day's schedule: {}", e),
                }
            }
            println!();
            print!("{}", render_report(&location, &schedule, now));
        }
    })
}

/// Run in GUI mode - desktop widget
#[cfg(feature = "gui")]
fn run_gui(rt: tokio::runtime::Runtime, config: Arc<AppConfig>, services: Services) -> Result<()> {
    // iced's tokio executor needs an entered runtime for reqwest
    let _guard = rt.enter();

    let window_width = config.window.width;
    let window_height = config.window.height;
    let title = config.window.title.clone();

    let app = iced::application(
        move || PrayerTimesApp::new(config.clone(), services.clone()),
        update,
        view,
    )
    .title(move |_: &PrayerTimesApp| title.clone())
    .subscription(subscription)
    .theme(theme)
    .window(iced::window::Settings {
        size: iced::Size::new(window_width, window_height),
        ..Default::default()
    })
    .antialiasing(true);

    app.run().context("Failed to run application")?;

    Ok(())
}

#[cfg(feature = "gui")]
fn update(app: &mut PrayerTimesApp, message: Message) -> iced::Task<Message> {
    app.update(message)
}

#[cfg(feature = "gui")]
fn view(app: &PrayerTimesApp) -> iced::Element<'_, Message> {
    app.view()
}

#[cfg(feature = "gui")]
fn subscription(app: &PrayerTimesApp) -> iced::Subscription<Message> {
    app.subscription()
}

#[cfg(feature = "gui")]
fn theme(app: &PrayerTimesApp) -> iced::Theme {
    app.theme()
}
