//! Terminal line charts.
//!
//! Stands in for the plotting window of a desktop toolkit: each chart
//! takes over the alternate screen and blocks until a key is pressed.

use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};

/// An ordered series of (x, y) pairs with labels, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

impl LineChart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            points,
        }
    }
}

/// Sink that receives charts. The terminal renderer is the normal
/// implementation; tests substitute a recording stub.
pub trait ChartSink {
    fn render(&mut self, chart: &LineChart) -> Result<()>;
}

/// Renders each chart fullscreen and waits for a key press.
#[derive(Debug, Default)]
pub struct TerminalCharts;

impl ChartSink for TerminalCharts {
    fn render(&mut self, chart: &LineChart) -> Result<()> {
        if chart.points.is_empty() {
            return Ok(());
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Draw once, then block until a key press; restore the
        // terminal regardless of success or failure.
        let result = show_chart(&mut terminal, chart);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}

fn show_chart(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    chart: &LineChart,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, chart))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

fn draw(frame: &mut Frame, chart: &LineChart) {
    let (x_bounds, y_bounds) = bounds(&chart.points);

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(&chart.points)];

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} (press any key to close) ", chart.title))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );

    frame.render_widget(widget, frame.area());
}

/// Axis bounds with a little headroom so the line never hugs the frame.
fn bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let y_pad = ((y_max - y_min) * 0.1).max(1.0);
    ([x_min, x_max.max(x_min + 1.0)], [
        (y_min - y_pad).min(0.0),
        y_max + y_pad,
    ])
}

fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        format!("{:.0}", bounds[0]),
        format!("{:.0}", mid),
        format!("{:.0}", bounds[1]),
    ]
}
