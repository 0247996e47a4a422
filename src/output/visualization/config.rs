//! Plot configuration shared across chart types

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// # Example
///
/// ```rust,ignore
/// use ignite_rs::output::visualization::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::temperature_traces("Methane, 1250 K");
/// config.width = 1920;
/// config.height = 1080;
/// config.series_colors = Some(vec![RED, BLUE, GREEN]);
/// ```
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    /// X-axis label (default: auto-set by plot type)
    pub xlabel: String,

    /// Y-axis label (default: auto-set by plot type)
    pub ylabel: String,

    /// Line color for single-curve plots (default: RED)
    pub line_color: RGBColor,

    /// Optional colors for multi-curve plots (one per curve)
    ///
    /// If None, uses the default palette: [RED, BLUE, GREEN, MAGENTA, CYAN, ...]
    pub series_colors: Option<Vec<RGBColor>>,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,

    /// Mark detected ignition points on temperature traces (default: true)
    pub mark_ignition: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: String::new(),
            ylabel: String::new(),
            line_color: RED,
            series_colors: None,
            background: WHITE,
            line_width: 2,
            show_grid: true,
            mark_ignition: true,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// Constant for no title (default title will be used)
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Temperature vs time, one trace per grid point
    ///
    /// Sets xlabel to "Time (ms)", ylabel to "Temperature (K)" and title to
    /// the custom value or "Temperature History"
    pub fn temperature_traces(title: impl IntoOptionalTitle) -> Self {
        Self {
            xlabel: "Time (ms)".to_string(),
            ylabel: "Temperature (K)".to_string(),
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Temperature History".to_string()),
            ..Self::default()
        }
    }

    /// Ignition delay vs a swept parameter
    ///
    /// Sets ylabel to "Ignition delay (ms)" and title to the custom value or
    /// "Ignition Delay"; the x label comes from the swept axis.
    pub fn delay_curve(title: impl IntoOptionalTitle) -> Self {
        Self {
            ylabel: "Ignition delay (ms)".to_string(),
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Ignition Delay".to_string()),
            ..Self::default()
        }
    }

    /// Create config for multi-curve plots with custom colors
    pub fn series_colors(colors: Vec<RGBColor>) -> Self {
        Self {
            series_colors: Some(colors),
            ..Self::default()
        }
    }

    /// Get color for curve at index i
    ///
    /// Uses custom colors if provided, otherwise falls back to default palette
    pub(crate) fn get_series_color(&self, index: usize) -> RGBColor {
        if let Some(colors) = &self.series_colors
            && index < colors.len()
        {
            return colors[index];
        }

        const PALETTE: [RGBColor; 10] = [
            RED,
            BLUE,
            GREEN,
            MAGENTA,
            CYAN,
            BLACK,
            RGBColor(255, 165, 0),   // Orange
            RGBColor(128, 0, 128),   // Purple
            RGBColor(255, 192, 203), // Pink
            RGBColor(165, 42, 42),   // Brown
        ];

        PALETTE[index % PALETTE.len()]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
