//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap,
};

use super::runtime::App;
use super::style;
use crate::charts::{ChartKind, ChartWidget};

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // header
            Constraint::Length(3),      // stat cards
            Constraint::Min(10),        // flow chart
            Constraint::Percentage(35), // SOC + actions
            Constraint::Length(1),      // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_stats(frame, app, chunks[1]);

    let charts = app.dashboard.charts();
    render_chart(frame, &charts.flow, chunks[2]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_chart(frame, &charts.soc, bottom[0]);
    render_chart(frame, &charts.action, bottom[1]);

    render_footer(frame, app, chunks[4]);

    if let Some(message) = app.dashboard.notice() {
        render_notice(frame, message, app.dashboard.pending_notices());
    }
}

/// Header bar: title, endpoint and busy indicator.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (icon, label, color) = if app.dashboard.is_busy() {
        ("⟳", "EVALUATING", style::BUSY)
    } else {
        ("●", "IDLE", style::IDLE)
    };

    let header = Line::from(vec![
        Span::styled(
            " SMARTGRID-DASH ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} │ ", app.endpoint)),
        Span::styled(
            format!("{icon} {label}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Four summary cards side by side.
fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let values = match app.dashboard.stats() {
        Some(s) => [
            s.peak_load_text(),
            s.renewable_purity_text(),
            s.grid_imbalance_text(),
            s.battery_cycles_text(),
        ],
        None => std::array::from_fn(|_| "--".to_string()),
    };
    let titles = [
        " Peak Load ",
        " Renewable Purity ",
        " Grid Imbalance ",
        " Battery Cycles ",
    ];

    for ((title, value), cell) in titles.iter().zip(values).zip(cells.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default()
                .fg(style::STAT_VALUE)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title(*title).borders(Borders::ALL));
        frame.render_widget(card, *cell);
    }
}

/// Draws one chart widget.
fn render_chart(frame: &mut Frame, chart: &ChartWidget, area: Rect) {
    let series_points: Vec<_> = chart
        .datasets()
        .iter()
        .map(|d| (d.series, chart.points(d.series)))
        .collect();

    let graph_type = match chart.kind {
        ChartKind::Line => GraphType::Line,
        ChartKind::Bar => GraphType::Bar,
    };

    let datasets: Vec<Dataset> = series_points
        .iter()
        .map(|(series, points)| {
            Dataset::default()
                .name(series.name())
                .marker(symbols::Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(style::series_color(*series)))
                .data(points)
        })
        .collect();

    let x_bounds = chart.x_bounds();
    let y_bounds = chart.y_bounds();
    let axis_style = Style::default().fg(style::AXIS);

    let mut widget = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ", chart.title))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds(x_bounds)
                .labels(x_labels(chart)),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );
    if !chart.show_legend {
        widget = widget.legend_position(None);
    }

    frame.render_widget(widget, area);
}

/// First, middle and last timestamp labels.
fn x_labels(chart: &ChartWidget) -> Vec<String> {
    let labels = chart.labels();
    match labels.len() {
        0 => vec![String::new(), String::new()],
        1 => vec![labels[0].to_string(), String::new()],
        n => vec![
            labels[0].to_string(),
            labels[n / 2].to_string(),
            labels[n - 1].to_string(),
        ],
    }
}

/// Footer with keybinding hints and the latest status message.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " q:Quit  r/Enter:Run evaluation  e:Export CSV",
        Style::default().fg(style::FOOTER_FG),
    )];
    if let Some(status) = &app.status {
        spans.push(Span::raw(format!("  │ {status}")));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Modal notice centered over the dashboard.
fn render_notice(frame: &mut Frame, message: &str, pending: usize) {
    let area = centered_rect(60, 7, frame.area());
    let title = if pending > 1 {
        format!(" Notice (1/{pending}) ")
    } else {
        " Notice ".to_string()
    };
    let notice = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: dismiss",
            Style::default().fg(style::FOOTER_FG),
        )),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(style::NOTICE_BORDER)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(notice, area);
}

/// Rectangle `percent_x` wide and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
