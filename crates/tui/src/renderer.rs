//! ratatui rendering: readouts header, the profile/measured chart, and a
//! footer with notifications and key help. Also records the plot region
//! each frame so mouse events can be mapped back to data coordinates.

use ovenpilot_core::ProcessState;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::app::{App, PidField};

const PROFILE_COLOR: Color = Color::Cyan;
const MEASURED_COLOR: Color = Color::Red;
const SELECTED_COLOR: Color = Color::Yellow;

pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let [header, chart, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(8),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    draw_header(frame, app, header);
    draw_chart(frame, app, chart);
    draw_footer(frame, app, footer);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let readouts = app.session.readouts();
    let state = app.session.state();
    let state_style = match state {
        ProcessState::Running => Style::default().fg(Color::Green),
        ProcessState::Killed => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Gray),
    };

    let status = Line::from(vec![
        Span::styled("ovenpilot", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  temp {:.2} °C  ", readouts.current_temp)),
        Span::raw("process: "),
        Span::styled(state.to_string(), state_style),
        Span::raw(format!("  output {:.1} %", readouts.power_pct)),
    ]);

    let inputs = app.session.pid_inputs();
    let mut gains = vec![Span::raw("gains ")];
    for (field, label, value) in [
        (PidField::Kp, "kp ", &inputs.kp),
        (PidField::Ki, "  ki ", &inputs.ki),
        (PidField::Kd, "  kd ", &inputs.kd),
    ] {
        gains.push(Span::raw(label));
        let style = if app.pid_focus == Some(field) {
            Style::default().fg(Color::Black).bg(SELECTED_COLOR)
        } else {
            Style::default().fg(Color::White)
        };
        gains.push(Span::styled(value.clone(), style));
    }
    if app.pid_focus.is_some() {
        gains.push(Span::styled(
            "   tab: next field, enter: done",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(vec![status, Line::from(gains)]), area);
}

fn draw_chart(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let bounds = app.session.bounds();

    let profile: Vec<(f64, f64)> = app
        .session
        .profile()
        .points()
        .iter()
        .map(|p| (p.x, p.y))
        .collect();
    let measured: Vec<(f64, f64)> = app
        .session
        .recorded()
        .points()
        .iter()
        .map(|p| (p.x, p.y))
        .collect();
    let selected: Vec<(f64, f64)> = app
        .session
        .profile()
        .selected()
        .and_then(|i| app.session.profile().points().get(i))
        .map(|p| (p.x, p.y))
        .into_iter()
        .collect();

    let mut datasets = vec![
        Dataset::default()
            .name("profile")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(PROFILE_COLOR))
            .data(&profile),
        Dataset::default()
            .name("measured")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(MEASURED_COLOR))
            .data(&measured),
    ];
    if !selected.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(SELECTED_COLOR))
                .data(&selected),
        );
    }

    let x_labels = axis_labels(bounds.x_max);
    let y_labels = axis_labels(bounds.y_max);

    let block = Block::default().borders(Borders::ALL).title("time [s] / temperature [°C]");
    let inner = block.inner(area);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, bounds.x_max])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, bounds.y_max])
                .labels(y_labels)
                .style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(chart, area);

    // the widget reserves the bottom row for x labels and the left
    // columns for y labels; mirror that layout for mouse mapping
    let y_label_width = format!("{:.0}", bounds.y_max).len() as u16 + 1;
    app.graph_area = Some(Rect {
        x: inner.x + y_label_width,
        y: inner.y,
        width: inner.width.saturating_sub(y_label_width),
        height: inner.height.saturating_sub(1),
    });
}

fn axis_labels(max: f64) -> Vec<String> {
    [0.0, max / 2.0, max]
        .iter()
        .map(|v| format!("{v:.0}"))
        .collect()
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let notice = match (app.session.notice(), app.note.as_deref()) {
        (Some(error), _) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        (None, Some(note)) => Line::from(Span::styled(
            note.to_string(),
            Style::default().fg(Color::Gray),
        )),
        (None, None) => Line::default(),
    };
    let help = Line::from(Span::styled(
        "click add · drag move · right-click delete · r run · s stop · c clear · \
         o load recipe · w save recipe · d export data · p gains · q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(vec![notice, help]), area);
}
