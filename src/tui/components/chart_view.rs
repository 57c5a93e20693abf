//! Drawing of dispatcher output with ratatui's chart widgets

use crate::services::chart_service::{BoxStats, ChartSpec, HistogramBin};
use crate::tui::Theme;
use ratatui::{
    layout::{Direction, Rect},
    style::Style,
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Rectangle},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame,
};

/// Draw a chart into `area`
pub fn render_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, theme: &Theme) {
    match spec {
        ChartSpec::Bars {
            x_label,
            y_label,
            bars,
        } => render_bars(frame, area, x_label, y_label, bars, theme),
        ChartSpec::Histogram { x_label, bins } => render_histogram(frame, area, x_label, bins, theme),
        ChartSpec::Pie { label, slices } => render_pie(frame, area, label, slices, theme),
        ChartSpec::Scatter {
            x_label,
            y_label,
            points,
            x_categories,
        } => render_scatter(
            frame,
            area,
            x_label,
            y_label,
            points,
            x_categories.as_deref(),
            theme,
        ),
        ChartSpec::Boxplot {
            x_label,
            y_label,
            groups,
        } => render_boxplot(frame, area, x_label, y_label, groups, theme),
    }
}

/// Draw a warning in place of a chart
pub fn render_warning(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let width = (area.width as usize).saturating_sub(2).max(10);
    let mut text = vec![Line::default()];
    for line in textwrap::wrap(&format!("⚠ {}", message), width) {
        text.push(Line::styled(line.into_owned(), theme.warning_style()));
    }
    text.push(Line::styled("Press y to pick a Y column.", theme.muted_style()));
    frame.render_widget(Paragraph::new(text).block(chart_block("No chart", theme)), area);
}

fn chart_block<'a>(title: impl Into<Line<'a>>, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::TOP)
        .border_style(theme.muted_style())
        .title(title)
}

/// Compact number formatting for labels
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else if value.abs() >= 100.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// `[min, max]` of the values, widened so a flat series still has extent
pub fn axis_bounds<I: IntoIterator<Item = f64>>(values: I) -> [f64; 2] {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if lo == hi {
        return [lo - 1.0, hi + 1.0];
    }
    let pad = (hi - lo) * 0.05;
    [lo - pad, hi + pad]
}

/// Scale applied to f64 bar heights so fractional sums keep their shape
fn bar_scale(values: &[f64]) -> f64 {
    if values.iter().all(|v| v.fract() == 0.0) {
        1.0
    } else {
        100.0
    }
}

fn truncate_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// Vertical bars when they fit side by side, horizontal otherwise
fn bar_layout(count: usize, area: Rect) -> (Direction, u16) {
    let count = count.max(1) as u16;
    let per_bar = area.width.saturating_sub(2) / count;
    if per_bar >= 4 {
        (Direction::Vertical, (per_bar - 1).min(12))
    } else {
        (Direction::Horizontal, 1)
    }
}

fn draw_bar_chart(
    frame: &mut Frame,
    area: Rect,
    title: String,
    entries: Vec<(String, u64, String)>,
    theme: &Theme,
) {
    let (direction, bar_width) = bar_layout(entries.len(), area);
    let label_width = match direction {
        Direction::Vertical => bar_width as usize,
        Direction::Horizontal => 16,
    };
    let bars: Vec<Bar> = entries
        .into_iter()
        .enumerate()
        .map(|(i, (label, value, text))| {
            Bar::default()
                .value(value)
                .label(Line::from(truncate_label(&label, label_width)))
                .text_value(text)
                .style(Style::default().fg(theme.series_color(i)))
                .value_style(theme.selected_style())
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(title, theme))
        .direction(direction)
        .bar_width(bar_width)
        .bar_gap(if direction == Direction::Vertical { 1 } else { 0 })
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    x_label: &str,
    y_label: &str,
    bars: &[(String, f64)],
    theme: &Theme,
) {
    let values: Vec<f64> = bars.iter().map(|(_, v)| *v).collect();
    let scale = bar_scale(&values);
    let entries = bars
        .iter()
        .map(|(label, v)| {
            (
                label.clone(),
                (v.max(0.0) * scale).round() as u64,
                format_number(*v),
            )
        })
        .collect();
    draw_bar_chart(frame, area, bars_title(x_label, y_label, &values), entries, theme);
}

/// Bars cannot go below the axis, so negative sums are called out in the title
fn bars_title(x_label: &str, y_label: &str, values: &[f64]) -> String {
    if values.iter().any(|v| *v < 0.0) {
        format!(" {} by {} (negatives drawn at 0) ", y_label, x_label)
    } else {
        format!(" {} by {} ", y_label, x_label)
    }
}

fn render_histogram(frame: &mut Frame, area: Rect, x_label: &str, bins: &[HistogramBin], theme: &Theme) {
    let entries = bins
        .iter()
        .map(|bin| (bin.label.clone(), bin.count, bin.count.to_string()))
        .collect();
    draw_bar_chart(frame, area, format!(" Distribution of {} ", x_label), entries, theme);
}

/// Pie charts become horizontal share bars; the terminal has no arcs
fn render_pie(frame: &mut Frame, area: Rect, label: &str, slices: &[(String, u64)], theme: &Theme) {
    let total: u64 = slices.iter().map(|(_, c)| c).sum();
    let bars: Vec<Bar> = slices
        .iter()
        .enumerate()
        .map(|(i, (name, count))| {
            let share = if total == 0 {
                0.0
            } else {
                *count as f64 * 100.0 / total as f64
            };
            Bar::default()
                .value(*count)
                .label(Line::from(truncate_label(name, 16)))
                .text_value(format!("{} ({:.1}%)", count, share))
                .style(Style::default().fg(theme.series_color(i)))
                .value_style(theme.selected_style())
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(format!(" Share of {} ", label), theme))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_scatter(
    frame: &mut Frame,
    area: Rect,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
    x_categories: Option<&[String]>,
    theme: &Theme,
) {
    let x_bounds = axis_bounds(points.iter().map(|(x, _)| *x));
    let y_bounds = axis_bounds(points.iter().map(|(_, y)| *y));

    let x_labels: Vec<Line> = match x_categories {
        Some(categories) if !categories.is_empty() => {
            let first = categories.first().cloned().unwrap_or_default();
            let last = categories.last().cloned().unwrap_or_default();
            vec![Line::from(first), Line::from(last)]
        }
        _ => bound_labels(x_bounds),
    };

    let dataset = Dataset::default()
        .name(format!("{} rows", points.len()))
        .marker(Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(theme.series_color(0)))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(chart_block(format!(" {} vs {} ", y_label, x_label), theme))
        .x_axis(
            Axis::default()
                .title(x_label.to_string())
                .style(theme.muted_style())
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(y_label.to_string())
                .style(theme.muted_style())
                .bounds(y_bounds)
                .labels(bound_labels(y_bounds)),
        );
    frame.render_widget(chart, area);
}

fn bound_labels(bounds: [f64; 2]) -> Vec<Line<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        Line::from(format_number(bounds[0])),
        Line::from(format_number(mid)),
        Line::from(format_number(bounds[1])),
    ]
}

fn render_boxplot(
    frame: &mut Frame,
    area: Rect,
    x_label: &str,
    y_label: &str,
    groups: &[BoxStats],
    theme: &Theme,
) {
    let y_bounds = axis_bounds(groups.iter().flat_map(|g| [g.min, g.max]));
    // Leave room under the boxes for group labels
    let label_row = y_bounds[0] - (y_bounds[1] - y_bounds[0]) * 0.08;
    let width = groups.len().max(1) as f64;
    let colors: Vec<_> = (0..groups.len()).map(|i| theme.series_color(i)).collect();
    let muted = theme.muted;
    let label_width = ((area.width as usize) / groups.len().max(1)).saturating_sub(1).max(1);

    let canvas = Canvas::default()
        .block(chart_block(
            format!(
                " {} by {}  [{} .. {}] ",
                y_label,
                x_label,
                format_number(y_bounds[0]),
                format_number(y_bounds[1])
            ),
            theme,
        ))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([label_row, y_bounds[1]])
        .paint(move |ctx| {
            for (i, group) in groups.iter().enumerate() {
                let color = colors[i];
                let center = i as f64 + 0.5;
                let half = 0.25;

                ctx.draw(&CanvasLine::new(center, group.min, center, group.q1, color));
                ctx.draw(&CanvasLine::new(center, group.q3, center, group.max, color));
                ctx.draw(&CanvasLine::new(center - half / 2.0, group.min, center + half / 2.0, group.min, color));
                ctx.draw(&CanvasLine::new(center - half / 2.0, group.max, center + half / 2.0, group.max, color));
                ctx.draw(&Rectangle {
                    x: center - half,
                    y: group.q1,
                    width: half * 2.0,
                    height: group.q3 - group.q1,
                    color,
                });
                ctx.draw(&CanvasLine::new(center - half, group.median, center + half, group.median, color));
                ctx.print(
                    i as f64 + 0.05,
                    label_row,
                    Line::styled(truncate_label(&group.label, label_width), Style::default().fg(muted)),
                );
            }
        });
    frame.render_widget(canvas, area);
}
