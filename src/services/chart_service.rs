//! Chart dispatcher
//!
//! Maps a chart-type selection plus axis choices to the data a chart widget
//! needs. Rendering lives in the TUI; everything here is plain data so it can
//! be tested without a terminal.

use crate::core::error::ChartError;
use crate::core::models::TableFrame;
use crate::core::types::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::debug;

/// Warning shown instead of a chart when a mode needs a numeric Y axis
pub const MISSING_Y_WARNING: &str = "This chart needs a numeric column for the Y axis.";

/// Chart types offered by the chart selector.
///
/// Parses from the selector labels as well as English aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum ChartKind {
    #[strum(to_string = "Barras", serialize = "bar", serialize = "bars")]
    Bar,
    #[strum(to_string = "Dispersión", serialize = "Dispersion", serialize = "scatter")]
    Scatter,
    #[strum(to_string = "Histograma", serialize = "histogram")]
    Histogram,
    #[strum(to_string = "Pastel", serialize = "pie")]
    Pie,
    #[strum(to_string = "Boxplot", serialize = "box")]
    Boxplot,
}

impl ChartKind {
    /// Whether the mode cannot be drawn without a Y column
    pub fn requires_y(&self) -> bool {
        matches!(self, Self::Scatter | Self::Boxplot)
    }

    /// Whether a chosen Y column is used at all
    pub fn uses_y(&self) -> bool {
        matches!(self, Self::Bar | Self::Scatter | Self::Boxplot)
    }

    /// Next kind in selector order, wrapping around
    pub fn next(&self) -> Self {
        let all: Vec<Self> = Self::iter().collect();
        let idx = all.iter().position(|k| k == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all: Vec<Self> = Self::iter().collect();
        let idx = all.iter().position(|k| k == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }

    /// Parse a selector label, reporting unknown labels as a chart error
    pub fn parse(label: &str) -> Result<Self, ChartError> {
        label
            .parse()
            .map_err(|_| ChartError::UnknownKind(label.to_string()))
    }
}

impl Default for ChartKind {
    fn default() -> Self {
        Self::Bar
    }
}

/// What the user asked to plot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub x_axis: String,
    pub y_axis: Option<String>,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, x_axis: impl Into<String>, y_axis: Option<String>) -> Self {
        Self {
            kind,
            x_axis: x_axis.into(),
            y_axis,
        }
    }
}

/// Tuning knobs for the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub histogram_bins: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self { histogram_bins: 10 }
    }
}

/// One histogram bucket; `start`/`end` are set for numeric data only
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub label: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub count: u64,
}

/// Five-number summary of one boxplot group
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

/// Data ready to hand to a chart widget
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Bars {
        x_label: String,
        y_label: String,
        bars: Vec<(String, f64)>,
    },
    Scatter {
        x_label: String,
        y_label: String,
        points: Vec<(f64, f64)>,
        /// Category names when X is not numeric; point X values index into it
        x_categories: Option<Vec<String>>,
    },
    Histogram {
        x_label: String,
        bins: Vec<HistogramBin>,
    },
    Pie {
        label: String,
        slices: Vec<(String, u64)>,
    },
    Boxplot {
        x_label: String,
        y_label: String,
        groups: Vec<BoxStats>,
    },
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Bars { .. } => ChartKind::Bar,
            Self::Scatter { .. } => ChartKind::Scatter,
            Self::Histogram { .. } => ChartKind::Histogram,
            Self::Pie { .. } => ChartKind::Pie,
            Self::Boxplot { .. } => ChartKind::Boxplot,
        }
    }
}

/// Result of a chart request: either a chart or a user-facing warning
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Chart(ChartSpec),
    Warning(String),
}

/// Build the chart for `request` over the rows in `frame`.
///
/// A mode that needs a Y axis but has none, or whose Y column is not numeric,
/// yields [`ChartOutcome::Warning`] instead of a chart.
pub fn dispatch(
    frame: &TableFrame,
    request: &ChartRequest,
    options: &ChartOptions,
) -> Result<ChartOutcome, ChartError> {
    let x_index = frame
        .column_index(&request.x_axis)
        .ok_or_else(|| ChartError::UnknownColumn(request.x_axis.clone()))?;

    let y_index = match &request.y_axis {
        Some(name) if request.kind.uses_y() => {
            let idx = frame
                .column_index(name)
                .ok_or_else(|| ChartError::UnknownColumn(name.clone()))?;
            if !frame.columns[idx].column_type.is_numeric() {
                return Ok(ChartOutcome::Warning(MISSING_Y_WARNING.to_string()));
            }
            Some(idx)
        }
        _ => None,
    };

    if request.kind.requires_y() && y_index.is_none() {
        debug!(kind = %request.kind, "chart needs a Y axis");
        return Ok(ChartOutcome::Warning(MISSING_Y_WARNING.to_string()));
    }

    let x_label = request.x_axis.clone();
    let spec = match (request.kind, y_index) {
        (ChartKind::Bar, None) => ChartSpec::Bars {
            x_label,
            y_label: "count".to_string(),
            bars: value_counts(frame.values(x_index))
                .into_iter()
                .map(|(label, count)| (label, count as f64))
                .collect(),
        },
        (ChartKind::Bar, Some(y)) => ChartSpec::Bars {
            x_label,
            y_label: frame.columns[y].name.clone(),
            bars: sum_by_group(frame, x_index, y),
        },
        (ChartKind::Scatter, Some(y)) => {
            let (points, x_categories) = scatter_points(frame, x_index, y);
            ChartSpec::Scatter {
                x_label,
                y_label: frame.columns[y].name.clone(),
                points,
                x_categories,
            }
        }
        (ChartKind::Histogram, _) => ChartSpec::Histogram {
            bins: histogram(frame, x_index, options.histogram_bins),
            x_label,
        },
        (ChartKind::Pie, _) => ChartSpec::Pie {
            label: x_label,
            slices: value_counts(frame.values(x_index)),
        },
        (ChartKind::Boxplot, Some(y)) => ChartSpec::Boxplot {
            x_label,
            y_label: frame.columns[y].name.clone(),
            groups: box_groups(frame, x_index, y),
        },
        (ChartKind::Scatter | ChartKind::Boxplot, None) => {
            return Ok(ChartOutcome::Warning(MISSING_Y_WARNING.to_string()));
        }
    };

    debug!(kind = %request.kind, rows = frame.row_count(), "built chart");
    Ok(ChartOutcome::Chart(spec))
}

/// Count distinct non-null values, most frequent first.
///
/// Ties keep the order in which values first appear.
pub fn value_counts<'a, I>(values: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in values {
        if value.is_null() {
            continue;
        }
        let label = value.label();
        match index.get(&label) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(label.clone(), order.len());
                order.push((label, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

/// Sum Y per distinct X, in first appearance order
fn sum_by_group(frame: &TableFrame, x: usize, y: usize) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in &frame.rows {
        let (Some(xv), Some(yv)) = (row.get(x), row.get(y).and_then(CellValue::as_f64)) else {
            continue;
        };
        if xv.is_null() {
            continue;
        }
        let label = xv.label();
        match index.get(&label) {
            Some(&i) => groups[i].1 += yv,
            None => {
                index.insert(label.clone(), groups.len());
                groups.push((label, yv));
            }
        }
    }

    groups
}

fn scatter_points(frame: &TableFrame, x: usize, y: usize) -> (Vec<(f64, f64)>, Option<Vec<String>>) {
    let numeric_x = frame.columns[x].column_type.is_numeric();
    let mut categories: Vec<String> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut points = Vec::new();

    for row in &frame.rows {
        let (Some(xv), Some(yv)) = (row.get(x), row.get(y).and_then(CellValue::as_f64)) else {
            continue;
        };
        let xf = if numeric_x {
            match xv.as_f64() {
                Some(v) => v,
                None => continue,
            }
        } else {
            if xv.is_null() {
                continue;
            }
            let label = xv.label();
            let next = categories.len();
            let idx = *category_index.entry(label.clone()).or_insert_with(|| {
                categories.push(label);
                next
            });
            idx as f64
        };
        points.push((xf, yv));
    }

    (points, (!numeric_x).then_some(categories))
}

fn histogram(frame: &TableFrame, x: usize, max_bins: usize) -> Vec<HistogramBin> {
    if !frame.columns[x].column_type.is_numeric() {
        return value_counts(frame.values(x))
            .into_iter()
            .map(|(label, count)| HistogramBin {
                label,
                start: None,
                end: None,
                count,
            })
            .collect();
    }

    let values: Vec<f64> = frame.values(x).filter_map(CellValue::as_f64).collect();
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut distinct = values.clone();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    let bin_count = max_bins.max(1).min(distinct.len());

    if min == max || bin_count == 1 {
        return vec![HistogramBin {
            label: format_bound(min),
            start: Some(min),
            end: Some(max),
            count: values.len() as u64,
        }];
    }

    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0u64; bin_count];
    for v in &values {
        let idx = (((v - min) / width).floor() as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = min + width * i as f64;
            let end = if i + 1 == bin_count { max } else { start + width };
            HistogramBin {
                label: format!("{}-{}", format_bound(start), format_bound(end)),
                start: Some(start),
                end: Some(end),
                count,
            }
        })
        .collect()
}

fn box_groups(frame: &TableFrame, x: usize, y: usize) -> Vec<BoxStats> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in &frame.rows {
        let (Some(xv), Some(yv)) = (row.get(x), row.get(y).and_then(CellValue::as_f64)) else {
            continue;
        };
        if xv.is_null() {
            continue;
        }
        let label = xv.label();
        match index.get(&label) {
            Some(&i) => groups[i].1.push(yv),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push((label, vec![yv]));
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|(label, mut values)| {
            values.sort_by(f64::total_cmp);
            Some(BoxStats {
                label,
                min: *values.first()?,
                q1: quantile(&values, 0.25)?,
                median: quantile(&values, 0.5)?,
                q3: quantile(&values, 0.75)?,
                max: *values.last()?,
                count: values.len(),
            })
        })
        .collect()
}

/// Linearly interpolated quantile of sorted data; `None` when empty
fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

fn format_bound(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
