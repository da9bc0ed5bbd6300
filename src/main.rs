use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use snipmark::capture::image::{BackgroundImage, get_img_path, save_png};
use snipmark::capture::region::{CaptureArea, RegionSelector, crop_to_area};
use snipmark::{EditorConfig, EditorSession, InputEvent, Point};

#[derive(Parser, Debug)]
#[command(
    name = "snipmark",
    version,
    about = "Annotate a screenshot with arrows, rectangles, ellipses and text"
)]
struct Args {
    /// Screenshot to annotate
    image: PathBuf,

    /// Device pixel ratio the screenshot was captured at
    #[arg(long, default_value_t = 1.0)]
    dpr: f32,

    /// JSON list of input events to replay
    #[arg(long)]
    events: Option<PathBuf>,

    /// Crop to x,y,w,h (CSS pixels) before editing
    #[arg(long, value_parser = parse_region)]
    region: Option<CaptureArea>,

    /// Output PNG (defaults to a timestamped file in the save location)
    #[arg(long)]
    out: Option<PathBuf>,
}

/// `x,y,w,h` in CSS pixels, subject to the minimum selection size
fn parse_region(raw: &str) -> anyhow::Result<CaptureArea> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid region: {raw}"))?;
    let &[x, y, w, h] = values.as_slice() else {
        bail!("Region needs four values x,y,w,h, got {raw}");
    };

    let mut selector = RegionSelector::new();
    selector.begin(Point::new(x, y));
    selector
        .finish(Point::new(x + w, y + h))
        .with_context(|| format!("Region {raw} is too small"))
}

fn load_events(path: &Path) -> anyhow::Result<Vec<InputEvent>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event script: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid event script: {}", path.display()))
}

fn run(args: Args) -> anyhow::Result<PathBuf> {
    let config = EditorConfig::load();

    let mut background = BackgroundImage::open(&args.image)?;
    if let Some(area) = args.region {
        let cropped = crop_to_area(&background.rgba, &area, args.dpr)
            .context("Region lies outside the image")?;
        background = BackgroundImage::from_rgba(cropped)?;
    }

    let mut session = EditorSession::new(background, args.dpr, &config)?;
    if let Some(path) = &args.events {
        let events = load_events(path)?;
        log::info!("Replaying {} events", events.len());
        for event in events {
            let effects = session.handle(event);
            log::debug!("effects {:?}", effects);
        }
    }

    let out = match args.out {
        Some(out) => out,
        None => get_img_path(config.save_location).context("No output directory available")?,
    };
    save_png(&session.export_image(), &out)?;
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let out = run(args)?;
    println!("{}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("snipmark").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_full_command_line() {
        let parsed = args(&[
            "shot.png",
            "--dpr",
            "2",
            "--events",
            "script.json",
            "--region",
            "10,20,100,50",
            "--out",
            "out.png",
        ])
        .unwrap();
        assert_eq!(parsed.image, PathBuf::from("shot.png"));
        assert_eq!(parsed.dpr, 2.0);
        assert_eq!(parsed.events, Some(PathBuf::from("script.json")));
        assert_eq!(
            parsed.region,
            Some(CaptureArea {
                x: 10.0,
                y: 20.0,
                width: 100.0,
                height: 50.0
            })
        );
        assert_eq!(parsed.out, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(args(&[]).is_err());
        assert!(args(&["a.png", "--dpr"]).is_err());
        assert!(args(&["a.png", "--dpr", "two"]).is_err());
        assert!(args(&["a.png", "--bogus"]).is_err());
        assert!(args(&["a.png", "b.png"]).is_err());
        assert!(args(&["a.png", "--region", "1,2,3"]).is_err());
        assert!(args(&["a.png", "--region", "0,0,5,50"]).is_err());
    }

    #[test]
    fn test_run_replays_script_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let script = dir.path().join("events.json");
        let out = dir.path().join("out.png");

        let rgba = image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 255, 255, 255]));
        save_png(&rgba, &input).unwrap();
        std::fs::write(
            &script,
            r##"[
                {"type": "select_tool", "tool": "rectangle"},
                {"type": "pointer_down", "x": 4, "y": 4},
                {"type": "pointer_move", "x": 40, "y": 40},
                {"type": "pointer_up", "x": 40, "y": 40}
            ]"##,
        )
        .unwrap();

        let saved = run(Args {
            image: input,
            dpr: 1.0,
            events: Some(script),
            region: None,
            out: Some(out.clone()),
        })
        .unwrap();
        assert_eq!(saved, out);

        let result = BackgroundImage::open(&out).unwrap();
        assert_eq!((result.width(), result.height()), (64, 64));
        let [r, g, _, _] = result.rgba.get_pixel(4, 20).0;
        assert!(r > 200 && g < 60);
    }
}
