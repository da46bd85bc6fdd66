mod landmass;
mod session;
mod svg;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use globe::{GlobeConfig, GlobeEvent};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::landmass::load_landmass;
use crate::session::{Script, Session};

const DEFAULT_LANDMASS_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

#[derive(Parser, Debug)]
#[command(name = "durian-globe", about = "Render the durian stall globe to SVG")]
struct Args {
    /// Landmass dataset (TopoJSON or GeoJSON): a local path or an http(s) URL.
    #[arg(long)]
    landmass: Option<String>,
    /// Give up on the landmass after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Ticks to run at the configured tick rate.
    #[arg(long, default_value_t = 120)]
    ticks: u32,
    /// Stall id to select.
    #[arg(long)]
    select: Option<String>,
    /// Drag offset `dx,dy` in pixels, applied before ticking.
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    drag: Option<(f64, f64)>,
    /// Wheel delta; positive zooms out.
    #[arg(long, allow_hyphen_values = true)]
    zoom: Option<f64>,
    /// Only show stalls whose name or address matches.
    #[arg(long)]
    query: Option<String>,
    /// JSON file with globe settings; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "globe.svg")]
    out: PathBuf,
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected dx,dy, got {s:?}"))?;
    let a: f64 = a.trim().parse().map_err(|e| format!("bad dx {a:?}: {e}"))?;
    let b: f64 = b.trim().parse().map_err(|e| format!("bad dy {b:?}: {e}"))?;
    Ok((a, b))
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn load_config(path: Option<&Path>) -> Result<GlobeConfig, String> {
    let Some(path) = path else {
        return Ok(GlobeConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(args: Args) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let source = args
        .landmass
        .or_else(|| env::var("GLOBE_LANDMASS_URL").ok())
        .unwrap_or_else(|| DEFAULT_LANDMASS_URL.to_string());
    let timeout = Duration::from_millis(
        args.timeout_ms
            .unwrap_or_else(|| env_var_u64("GLOBE_FETCH_TIMEOUT_MS", 5_000)),
    );

    // The globe is usable while the dataset is still in flight.
    let fetch = tokio::spawn(load_landmass(source.clone(), timeout));

    let stalls = listings::search(
        &listings::demo_stalls(),
        args.query.as_deref().unwrap_or(""),
        None,
    );
    info!(stalls = stalls.len(), "starting globe session");
    let viewport = config.viewport;
    let mut session = Session::new(config, stalls);
    session.run(&Script {
        select: args.select,
        drag: args.drag,
        wheel: args.zoom,
        ticks: args.ticks,
    });

    match fetch.await {
        Ok(Ok(set)) => session.globe.set_landmass(set),
        Ok(Err(e)) => {
            warn!(source = %source, error = %e, "landmass unavailable; rendering without land");
            session.globe.landmass_unavailable(e.to_string());
        }
        Err(e) => {
            warn!(error = %e, "landmass task failed");
            session.globe.landmass_unavailable(e.to_string());
        }
    }

    let svg = svg::render_svg(session.globe.frame(), viewport);
    std::fs::write(&args.out, svg).map_err(|e| format!("{}: {e}", args.out.display()))?;

    session.globe.shutdown();
    for stamped in session.globe.drain_events() {
        if let GlobeEvent::Selected { id } = &stamped.event {
            info!(frame = stamped.frame_index, id = %id, "selection");
        } else {
            debug!(frame = stamped.frame_index, event = ?stamped.event, "globe event");
        }
    }
    info!(out = %args.out.display(), "wrote globe");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_config, parse_pair};
    use std::io::Write;

    #[test]
    fn parses_drag_pairs() {
        assert_eq!(parse_pair("40,-12.5"), Ok((40.0, -12.5)));
        assert_eq!(parse_pair(" 3 , 4 "), Ok((3.0, 4.0)));
        assert!(parse_pair("40").is_err());
        assert!(parse_pair("a,1").is_err());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(br#"{"base_scale": 180, "viewport": {"width": 400}}"#)
            .expect("write");
        let cfg = load_config(Some(file.path())).expect("config");
        assert_eq!(cfg.base_scale, 180.0);
        assert_eq!(cfg.viewport.width, 400.0);
        assert_eq!(cfg.viewport.height, 600.0);
        assert_eq!(cfg.tick_rate_hz, 60.0);
    }
}
