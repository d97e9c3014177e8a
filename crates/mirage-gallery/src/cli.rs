//! Command line options.

use clap::{Parser, ValueEnum};
use mirage_engine::logging::LoggingConfig;
use mirage_illusions::cafe_wall::CafeWallConfig;
use mirage_illusions::fake_cafe_wall::FakeCafeWallConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Demo {
    CafeWall,
    FakeCafeWall,
    Squint,
    Poggendorff,
    Ebbinghaus,
    AmesRoom,
}

impl Demo {
    pub(crate) fn title(self) -> &'static str {
        match self {
            Demo::CafeWall => "Café Wall Illusion",
            Demo::FakeCafeWall => "Fake Café Wall",
            Demo::Squint => "Squint Illusion",
            Demo::Poggendorff => "Poggendorff Illusion",
            Demo::Ebbinghaus => "Ebbinghaus Illusion",
            Demo::AmesRoom => "Ames Room",
        }
    }

    pub(crate) fn summary(self) -> &'static str {
        match self {
            Demo::CafeWall => "parallel mortar lines that look wedged",
            Demo::FakeCafeWall => "slanted mortar lines that look straight-but-wedged",
            Demo::Squint => "spinning hue wheels that make static arrows drift",
            Demo::Poggendorff => "a diagonal that seems to resume at the wrong height",
            Demo::Ebbinghaus => "equal discs that look different sizes",
            Demo::AmesRoom => "a distorted room that looks rectangular from the peephole",
        }
    }

    /// The name accepted by `--demo`.
    pub(crate) fn name(self) -> String {
        self.to_possible_value().map(|v| v.get_name().to_owned()).unwrap_or_default()
    }
}

#[derive(Clone, Debug, Parser)]
#[command(name = "mirage-gallery", version, about = "Optical illusion demos")]
pub(crate) struct GalleryArgs {
    /// Which illusion to open.
    #[arg(long, short = 'd', value_enum, default_value_t = Demo::CafeWall)]
    pub(crate) demo: Demo,

    /// Print the available demos and exit.
    #[arg(long)]
    pub(crate) list: bool,

    /// Initial window width in logical pixels.
    #[arg(long, value_name = "PX", default_value_t = 1280.0)]
    pub(crate) width: f64,

    /// Initial window height in logical pixels.
    #[arg(long, value_name = "PX", default_value_t = 720.0)]
    pub(crate) height: f64,

    /// Initial mortar slant of the fake café wall, in degrees. Rounded to the
    /// nearest slider step.
    #[arg(long, value_name = "DEG")]
    pub(crate) slant: Option<f32>,

    /// Tile rows of either café wall.
    #[arg(long, value_name = "N")]
    pub(crate) rows: Option<u32>,

    /// Tiles per row of either café wall.
    #[arg(long = "tiles-per-row", value_name = "N")]
    pub(crate) tiles_per_row: Option<u32>,

    /// More log output; repeat for trace.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,

    /// Log filter in `env_logger` syntax. Overrides `-v` and `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    pub(crate) log: Option<String>,
}

impl GalleryArgs {
    pub(crate) fn logging(&self) -> LoggingConfig {
        LoggingConfig { env_filter: self.log.clone(), ..LoggingConfig::default() }
            .with_verbosity(self.verbose)
    }

    pub(crate) fn wall_config(&self) -> CafeWallConfig {
        self.apply_wall(CafeWallConfig::default())
    }

    pub(crate) fn fake_wall_config(&self) -> FakeCafeWallConfig {
        let defaults = FakeCafeWallConfig::default();
        FakeCafeWallConfig {
            wall: self.apply_wall(defaults.wall.clone()),
            slant_default_deg: self.slant.unwrap_or(defaults.slant_default_deg),
            ..defaults
        }
    }

    fn apply_wall(&self, mut wall: CafeWallConfig) -> CafeWallConfig {
        if let Some(rows) = self.rows {
            wall.rows = rows;
        }
        if let Some(n) = self.tiles_per_row {
            wall.tiles_per_row = n;
        }
        wall
    }

    /// Rejects wall parameters before a window opens.
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.width > 0.0 && self.height > 0.0,
            "window size must be positive, got {}x{}",
            self.width,
            self.height
        );
        match self.demo {
            Demo::CafeWall => self.wall_config().validate()?,
            Demo::FakeCafeWall => self.fake_wall_config().validate()?,
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> GalleryArgs {
        GalleryArgs::try_parse_from(std::iter::once("mirage-gallery").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn command_definition_is_consistent() {
        GalleryArgs::command().debug_assert();
    }

    #[test]
    fn defaults_open_the_cafe_wall() {
        let args = parse(&[]);
        assert_eq!(args.demo, Demo::CafeWall);
        assert_eq!((args.width, args.height), (1280.0, 720.0));
        assert!(!args.list);
        assert_eq!(args.wall_config(), CafeWallConfig::default());
    }

    #[test]
    fn demo_names_are_kebab_case() {
        assert_eq!(parse(&["--demo", "fake-cafe-wall"]).demo, Demo::FakeCafeWall);
        assert_eq!(parse(&["-d", "ames-room"]).demo, Demo::AmesRoom);
        assert_eq!(Demo::Poggendorff.name(), "poggendorff");
        assert!(GalleryArgs::try_parse_from(["mirage-gallery", "--demo", "zollner"]).is_err());
    }

    #[test]
    fn wall_overrides_reach_both_walls() {
        let args = parse(&["--rows", "6", "--tiles-per-row", "10", "--slant", "4.5"]);
        assert_eq!(args.wall_config().rows, 6);
        let fake = args.fake_wall_config();
        assert_eq!((fake.wall.rows, fake.wall.tiles_per_row), (6, 10));
        assert_eq!(fake.slant_default_deg, 4.5);
        assert_eq!(fake.wall.guide_thickness, 0.03);
    }

    #[test]
    fn validate_catches_bad_walls() {
        assert!(parse(&["--rows", "0"]).validate().is_err());
        assert!(parse(&["-d", "fake-cafe-wall", "--slant", "15"]).validate().is_err());
        // Wall options are ignored by the other demos.
        assert!(parse(&["-d", "squint", "--rows", "0"]).validate().is_ok());
    }

    #[test]
    fn verbosity_and_filter_map_to_logging() {
        let args = parse(&["-vv", "--log", "mirage_illusions=debug"]);
        let cfg = args.logging();
        assert_eq!(cfg.default_level, log::LevelFilter::Trace);
        assert_eq!(cfg.env_filter.as_deref(), Some("mirage_illusions=debug"));
    }
}
