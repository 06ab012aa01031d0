//! Chart widget models.
//!
//! A [`ChartWidget`] holds everything needed to draw one chart: labels,
//! datasets and display options. Data is replaced in place and published
//! with an explicit [`ChartWidget::update`]; the terminal front-end draws
//! whatever the widget holds.

use crate::model::{EvaluationResult, Label};

/// How a chart draws its datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Connected line per dataset.
    Line,
    /// One bar per label.
    Bar,
}

/// Identifies a dataset and fixes its legend name and color slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    /// Demand (`load`).
    Demand,
    /// Solar generation.
    Solar,
    /// Wind generation.
    Wind,
    /// Net grid exchange.
    NetGrid,
    /// Battery state of charge.
    StateOfCharge,
    /// Battery control action.
    Action,
}

impl Series {
    /// Legend name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Demand => "Demand",
            Self::Solar => "Solar",
            Self::Wind => "Wind",
            Self::NetGrid => "Net Grid",
            Self::StateOfCharge => "Battery SOC",
            Self::Action => "Action (-1 Discharge, 1 Charge)",
        }
    }
}

/// Values of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Which series this is.
    pub series: Series,
    /// Y values, index-aligned with the chart labels.
    pub values: Vec<f64>,
}

/// In-memory chart: labels, datasets and display configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartWidget {
    /// Pane title.
    pub title: &'static str,
    /// Line or bar rendering.
    pub kind: ChartKind,
    /// Fixed y-axis range; auto-scaled when `None`.
    pub y_range: Option<[f64; 2]>,
    /// Whether the legend is drawn.
    pub show_legend: bool,
    labels: Vec<Label>,
    datasets: Vec<Dataset>,
    redraws: u64,
}

impl ChartWidget {
    /// Creates an empty chart with one dataset per series.
    pub fn new(title: &'static str, kind: ChartKind, series: &[Series]) -> Self {
        Self {
            title,
            kind,
            y_range: None,
            show_legend: true,
            labels: Vec::new(),
            datasets: series
                .iter()
                .map(|&series| Dataset {
                    series,
                    values: Vec::new(),
                })
                .collect(),
            redraws: 0,
        }
    }

    /// Pins the y axis to `[min, max]`.
    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some([min, max]);
        self
    }

    /// Hides the legend.
    pub fn without_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }

    /// Current x-axis labels.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Current datasets in legend order.
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Values of one series, if the chart carries it.
    pub fn values(&self, series: Series) -> Option<&[f64]> {
        self.datasets
            .iter()
            .find(|d| d.series == series)
            .map(|d| d.values.as_slice())
    }

    /// Number of [`update`](Self::update) calls so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Replaces the label sequence.
    pub fn set_labels(&mut self, labels: Vec<Label>) {
        self.labels = labels;
    }

    /// Replaces the values of `series`. Returns `false` if the chart has no
    /// such dataset.
    pub fn set_values(&mut self, series: Series, values: Vec<f64>) -> bool {
        match self.datasets.iter_mut().find(|d| d.series == series) {
            Some(dataset) => {
                dataset.values = values;
                true
            }
            None => false,
        }
    }

    /// Requests a redraw of the current contents.
    pub fn update(&mut self) {
        self.redraws += 1;
    }

    /// Plot points for one series, using the label index as x.
    ///
    /// Points stop at the shorter of the label and value sequences.
    pub fn points(&self, series: Series) -> Vec<(f64, f64)> {
        self.values(series)
            .unwrap_or_default()
            .iter()
            .take(self.labels.len())
            .enumerate()
            .map(|(i, &y)| (i as f64, y))
            .collect()
    }

    /// X-axis bounds covering every label.
    pub fn x_bounds(&self) -> [f64; 2] {
        let hi = self.labels.len().saturating_sub(1) as f64;
        [0.0, hi.max(1.0)]
    }

    /// Y-axis bounds: the fixed range, or the data range with 10% padding.
    pub fn y_bounds(&self) -> [f64; 2] {
        if let Some(range) = self.y_range {
            return range;
        }
        let all = self
            .datasets
            .iter()
            .flat_map(|d| d.values.iter().take(self.labels.len()))
            .copied()
            .filter(|v| v.is_finite());
        let min = all.clone().fold(f64::INFINITY, f64::min);
        let max = all.fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return [-1.0, 1.0];
        }
        let range = (max - min).max(0.1);
        let pad = range * 0.1;
        [min - pad, max + pad]
    }
}

/// The three dashboard charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    /// Demand, solar, wind and net grid lines.
    pub flow: ChartWidget,
    /// Battery state of charge, pinned to [0, 1].
    pub soc: ChartWidget,
    /// Battery actions as bars, pinned to [-1, 1].
    pub action: ChartWidget,
}

impl Charts {
    /// Builds the three charts with empty data.
    pub fn initialize() -> Self {
        Self {
            flow: ChartWidget::new(
                "Energy Flow",
                ChartKind::Line,
                &[Series::Demand, Series::Solar, Series::Wind, Series::NetGrid],
            ),
            soc: ChartWidget::new("Battery SOC", ChartKind::Line, &[Series::StateOfCharge])
                .with_y_range(0.0, 1.0)
                .without_legend(),
            action: ChartWidget::new("Battery Actions", ChartKind::Bar, &[Series::Action])
                .with_y_range(-1.0, 1.0)
                .without_legend(),
        }
    }

    /// Pushes a result into every chart and requests one redraw each.
    pub fn render(&mut self, result: &EvaluationResult) {
        self.flow.set_labels(result.timestamps.clone());
        self.flow.set_values(Series::Demand, result.load.clone());
        self.flow.set_values(Series::Solar, result.solar.clone());
        self.flow.set_values(Series::Wind, result.wind.clone());
        self.flow.set_values(Series::NetGrid, result.net_grid.clone());
        self.flow.update();

        self.soc.set_labels(result.timestamps.clone());
        self.soc.set_values(Series::StateOfCharge, result.soc.clone());
        self.soc.update();

        self.action.set_labels(result.timestamps.clone());
        self.action.set_values(Series::Action, result.actions.clone());
        self.action.update();
    }

    /// All three charts in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ChartWidget> {
        [&self.flow, &self.soc, &self.action].into_iter()
    }
}
