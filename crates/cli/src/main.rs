#![deny(unsafe_code)]
//! CLI binary for fieldviz.
//!
//! Subcommands:
//! - `list`: print available fields and derived scalars
//! - `streamlines <field>`: integrate streamlines from a seed grid
//! - `glyphs <field>`: evaluate the glyph lattice
//! - `color-image <field>`: render or fetch a cached scalar color image

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use fieldviz_core::color::{self, Srgb};
use fieldviz_core::params::param_f64;
use fieldviz_core::{
    flow_start_points, render_glyphs, stream_lines, GridConfig, RgbGradient, StreamlineConfig,
    VectorFieldConfig,
};
use fieldviz_render::cache::{CacheStatus, CachedImage, ImageCache};
use fieldviz_render::raster::RasterConfig;
use fieldviz_render::{FieldKind, ScalarKind};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "fieldviz", about = "Vector field and flow visualization CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available fields and derived scalars.
    List,
    /// Integrate streamlines seeded on a jittered grid.
    Streamlines {
        /// Field name (e.g. "cylinder").
        field: String,

        /// Field, grid and integrator parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Also render the field magnitude color image into this cache directory.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
    /// Evaluate the field on the glyph lattice.
    Glyphs {
        /// Field name (e.g. "dipole").
        field: String,

        /// Field, lattice and coloring parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Render (or fetch from cache) a color image of a derived scalar.
    ColorImage {
        /// Field name (e.g. "four-swirls").
        field: String,

        /// Scalar to draw (magnitude, divergence, curl).
        #[arg(short, long, default_value = "magnitude")]
        scalar: String,

        /// Image cache directory.
        #[arg(short, long, default_value = "images")]
        dir: PathBuf,

        /// Scalar value mapped to the first color.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        min: f64,

        /// Scalar value mapped to the last color.
        #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
        max: f64,

        /// Comma-separated hex colors; defaults to the scalar-field palette.
        #[arg(long, value_delimiter = ',')]
        colors: Vec<String>,

        /// Re-render even when a cached image exists.
        #[arg(long)]
        force: bool,

        /// Field and raster parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

fn parse_params(params: &str) -> Result<Value, CliError> {
    serde_json::from_str(params).map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))
}

fn parse_colors(colors: &[String]) -> Result<Vec<Srgb>, CliError> {
    if colors.is_empty() {
        return Ok(color::default_scalar_field_colors());
    }
    Ok(color::parse_hex_list(colors)?)
}

/// Magnitude coloring for streamline runs: `min_value`/`max_value` default to
/// the 0.5 and 1.5 magnitude band streamlines are drawn in.
fn streamline_gradient(params: &Value) -> Result<RgbGradient, CliError> {
    Ok(RgbGradient::scalar_field(
        param_f64(params, "min_value", 0.5),
        param_f64(params, "max_value", 1.5),
    )?)
}

fn report_image(image: &CachedImage, json_mode: bool) -> Result<(), CliError> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(image)?);
    } else {
        let status = match image.status {
            CacheStatus::Hit => "cached",
            CacheStatus::Rendered => "rendered",
        };
        println!("{status} {}", image.path.display());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let fields = FieldKind::list_fields();
            let scalars = ScalarKind::list_scalars();
            if cli.json {
                let info = json!({
                    "fields": fields,
                    "scalars": scalars,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Fields:");
                for name in fields {
                    println!("  {name}");
                }
                println!("Scalars:");
                println!("  {}", scalars.join(", "));
            }
        }
        Command::Streamlines {
            field,
            params,
            cache_dir,
        } => {
            let params = parse_params(&params)?;
            let kind = FieldKind::from_name(&field, &params)?;
            let grid = GridConfig::from_json(&params);
            let config = StreamlineConfig::from_json(&params);

            let seeds = flow_start_points(&grid)?;
            let lines = stream_lines(&kind, &seeds, &config)?;
            let truncated = lines.iter().filter(|l| l.is_truncated()).count();

            let image = match cache_dir {
                Some(dir) => {
                    let gradient = streamline_gradient(&params)?;
                    let cache = ImageCache::new(dir, RasterConfig::from_json(&params));
                    Some(cache.get_or_render(&ScalarKind::Magnitude.derive(kind.clone()), &gradient)?)
                }
                None => None,
            };

            if cli.json {
                let summaries: Vec<Value> = lines
                    .iter()
                    .map(|l| {
                        json!({
                            "seed": l.points()[0],
                            "termination": l.termination(),
                            "points": l.len(),
                            "anchors": l.anchors(config.n_anchors_per_line),
                        })
                    })
                    .collect();
                let info = json!({
                    "field": field,
                    "grid": grid,
                    "integrator": config,
                    "lines": summaries,
                    "image": image,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for (i, l) in lines.iter().enumerate() {
                    let seed = l.points()[0];
                    println!(
                        "{i:>5}  seed ({:.3}, {:.3})  {:?}  {} points, {} anchors",
                        seed.x,
                        seed.y,
                        l.termination(),
                        l.len(),
                        l.anchors(config.n_anchors_per_line).len()
                    );
                }
                eprintln!("{} streamlines for {field}, {truncated} truncated", lines.len());
                if let Some(image) = &image {
                    report_image(image, false)?;
                }
            }
        }
        Command::Glyphs { field, params } => {
            let params = parse_params(&params)?;
            let kind = FieldKind::from_name(&field, &params)?;
            let config = VectorFieldConfig::from_json(&params)?;
            let glyphs = render_glyphs(&kind, &config)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&glyphs)?);
            } else {
                for g in &glyphs {
                    println!(
                        "({:>6.2}, {:>6.2})  ->  ({:>7.4}, {:>7.4})  |v| {:<10.4}  {}",
                        g.position.x,
                        g.position.y,
                        g.vector.x,
                        g.vector.y,
                        g.magnitude,
                        g.color.to_hex()
                    );
                }
                eprintln!("{} glyphs for {field}", glyphs.len());
            }
        }
        Command::ColorImage {
            field,
            scalar,
            dir,
            min,
            max,
            colors,
            force,
            params,
        } => {
            let params = parse_params(&params)?;
            let kind = FieldKind::from_name(&field, &params)?;
            let scalar = ScalarKind::from_name(&scalar)?.derive(kind);
            let gradient = RgbGradient::new(min, max, parse_colors(&colors)?)?;
            let cache = ImageCache::new(dir, RasterConfig::from_json(&params));

            let image = if force {
                cache.render_fresh(&scalar, &gradient)?
            } else {
                cache.get_or_render(&scalar, &gradient)?
            };
            report_image(&image, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        log::debug!("exiting with code {}", e.exit_code());
        process::exit(e.exit_code());
    }
}
