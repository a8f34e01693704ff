use nalgebra::DMatrix;

/// The ten-colour colorblind-safe palette used for categorical series.
pub const COLORBLIND_PALETTE: [&str; 10] = [
    "#0173b2", "#de8f05", "#029e73", "#d55e00", "#cc78bc", "#ca9161", "#fbafe4", "#949494",
    "#ece133", "#56b4e9",
];

/// Styling passed explicitly to every plot call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub palette: Vec<String>,
    /// Hide the top and right spines.
    pub despine: bool,
    /// Draw a frame around legends.
    pub legend_frame: bool,
    /// Colormap for matrix images.
    pub colormap: String,
    /// Colour of run-boundary guide lines drawn over images.
    pub boundary_color: String,
    /// Apply axis labels, limits and titles. When `false` only data layers are emitted.
    pub format_axes: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            palette: COLORBLIND_PALETTE.iter().map(|c| c.to_string()).collect(),
            despine: true,
            legend_frame: false,
            colormap: "inferno".to_string(),
            boundary_color: "white".to_string(),
            format_axes: true,
        }
    }
}

impl PlotStyle {
    /// The `index`-th palette colour, cycling when the palette runs out.
    pub fn color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return "black";
        }
        &self.palette[index % self.palette.len()]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axis {
    pub label: Option<String>,
    pub ticks: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub limits: Option<(f64, f64)>,
}

impl Axis {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_limits(mut self, low: f64, high: f64) -> Self {
        self.limits = Some((low, high));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Line {
        label: Option<String>,
        x: Vec<f64>,
        y: Vec<Option<f64>>,
        color: String,
        line_width: f64,
        alpha: f64,
        marker: Option<char>,
    },
    Violin {
        position: usize,
        label: String,
        values: Vec<f64>,
        color: String,
    },
    /// Two distributions sharing one violin, one per half.
    SplitViolin {
        position: usize,
        label: String,
        left: Vec<f64>,
        right: Vec<f64>,
        left_color: String,
        right_color: String,
    },
    Image {
        data: DMatrix<f64>,
        colormap: String,
        colorbar_label: String,
    },
    /// A weighted kernel-density estimate over `x`.
    Density {
        label: String,
        x: Vec<f64>,
        weights: Vec<f64>,
        color: String,
    },
    /// A dashed reference line spanning the plot.
    Guide {
        orientation: Orientation,
        position: f64,
        color: String,
    },
}

impl Layer {
    /// A solid line with no markers, fully opaque.
    pub fn line(label: Option<String>, x: Vec<f64>, y: Vec<f64>, color: &str) -> Self {
        Layer::Line {
            label,
            x,
            y: y.into_iter().map(Some).collect(),
            color: color.to_string(),
            line_width: 1.5,
            alpha: 1.0,
            marker: None,
        }
    }
}

/// A renderer-agnostic description of one chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub layers: Vec<Layer>,
    pub legend: bool,
    pub legend_frame: bool,
    pub despine: bool,
}

impl Figure {
    /// An empty figure carrying the style's frame settings.
    pub fn styled(style: &PlotStyle) -> Self {
        Self {
            despine: style.despine,
            legend_frame: style.legend_frame,
            ..Self::default()
        }
    }

    /// Sets title and axes only if the style asks for formatted axes.
    pub fn format(mut self, style: &PlotStyle, title: Option<String>, x: Axis, y: Axis) -> Self {
        if style.format_axes {
            self.title = title;
            self.x_axis = x;
            self.y_axis = y;
        }
        self
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }
}

/// Something that can be drawn from a computed result.
pub trait Plot {
    fn plot(&self, style: &PlotStyle) -> Figure;
}
