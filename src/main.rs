//! Renders the holographic superconductor response curves (magnetic
//! susceptibility, GL parameter, penetration depth) as line charts.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use scripts::{penetration_depth, susceptibility, FigureKind};
use submodules::{chart::OutputFormat, configurations::Config, output::setup_output};
use tracing::info;

mod scripts;
mod submodules;

#[derive(Parser, Debug)]
#[command(name = "holo-sc-curves")]
#[command(about = "Holographic superconductor response curves", long_about = None)]
pub struct Args {
    /// Path to a JSON configuration file (defaults reproduce the reference figures)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Which figure to render
    #[arg(short, long, value_enum, default_value_t = FigureKind::All)]
    pub figure: FigureKind,

    /// Coupling constant e^2 (overrides config file)
    #[arg(long)]
    pub coupling: Option<f64>,

    /// Directory for rendered figures (overrides config file)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Image format (overrides config file)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Add the kappa^2 panel with the Type I / Type II boundary
    #[arg(long)]
    pub show_gl_parameter: bool,

    /// Drop the chi_m panel from the susceptibility figure
    #[arg(long)]
    pub hide_susceptibility: bool,

    /// Also write each curve as JSON next to the figure
    #[arg(long)]
    pub export_json: bool,

    /// Log file path (default stdout)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(coupling) = self.coupling {
            info!("Overriding coupling with: {}", coupling);
            config.coupling = coupling;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.show_gl_parameter {
            config.susceptibility.show_gl_parameter = true;
        }
        if self.hide_susceptibility {
            config.susceptibility.show_susceptibility = false;
        }
        if self.export_json {
            config.export_json = true;
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    setup_output(args.log_file.as_ref(), args.verbose);

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .wrap_err_with(|| format!("Unable to load configuration file: {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut config);
    config.validate(args.figure).wrap_err("Invalid configuration")?;
    info!("e^2 = {}, writing {:?} figures to {}", config.coupling, config.format, config.output_dir.display());

    if args.figure.includes(FigureKind::Susceptibility) {
        susceptibility::run(&config)?;
    }
    if args.figure.includes(FigureKind::PenetrationDepth) {
        penetration_depth::run(&config)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_keeps_defaults() {
        let args = Args::parse_from(["holo-sc-curves"]);
        assert_eq!(args.figure, FigureKind::All);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "holo-sc-curves", "--figure", "susceptibility", "--coupling", "0.5",
            "--format", "svg", "--show-gl-parameter", "--hide-susceptibility", "--export-json",
            "-o", "out",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(args.figure, FigureKind::Susceptibility);
        assert_eq!(config.coupling, 0.5);
        assert_eq!(config.format, OutputFormat::Svg);
        assert!(config.susceptibility.show_gl_parameter);
        assert!(!config.susceptibility.show_susceptibility);
        assert!(config.export_json);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn penetration_depth_figure_name() {
        let args = Args::parse_from(["holo-sc-curves", "-f", "penetration-depth"]);
        assert_eq!(args.figure, FigureKind::PenetrationDepth);
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
