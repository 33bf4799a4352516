use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Row, Table},
    Frame,
};
use wellness_core::{KeyValueStore, MetricDto};

use crate::dashboard::format_amount;
use crate::tui::app::App;

fn gauge_color(percentage: i64) -> Color {
    match percentage {
        p if p >= 100 => Color::Green,
        p if p >= 50 => Color::Cyan,
        p if p >= 25 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help
        ])
        .split(size);

    let header = Paragraph::new(Line::from(vec![
        Span::styled("WELLNESS", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}  ", app.snapshot.date)),
        Span::styled(
            format!("overall {}%", app.snapshot.overall_percentage),
            Style::default().fg(gauge_color(app.snapshot.overall_percentage)),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_chunks[1]);

    draw_metric_list(f, app, content_chunks[0]);
    draw_gauges(f, app, content_chunks[1]);

    let status = app.message.clone().unwrap_or_default();
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Yellow)),
        main_chunks[2],
    );

    let footer = Paragraph::new("j/k: Navigate | space/+: Quick add | -: Undo | r: Reset | q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_metric_list<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let rows: Vec<Row> = app
        .snapshot
        .metrics
        .iter()
        .map(|m| {
            Row::new(vec![
                Span::styled(m.label.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format_amount(m.kind, m.current)),
                Span::raw(format!("+{}", app.service.quick_add_step(m.kind))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),    // Label
            Constraint::Length(14), // Current
            Constraint::Length(8),  // Step
        ],
    )
    .header(Row::new(vec!["Metric", "Today", "Step"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Metrics ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_gauges<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::default()
        .title(" Progress ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = app.snapshot.metrics.iter().map(|_| Constraint::Length(3)).collect();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (metric, slot) in app.snapshot.metrics.iter().zip(slots.iter()) {
        f.render_widget(metric_gauge(metric), *slot);
    }
}

fn metric_gauge(metric: &MetricDto) -> Gauge<'static> {
    let label = format!(
        "{} / {} ({}%)",
        format_amount(metric.kind, metric.current),
        format_amount(metric.kind, metric.target),
        metric.percentage
    );
    Gauge::default()
        .block(Block::default().title(format!(" {} ", metric.label)))
        .gauge_style(Style::default().fg(gauge_color(metric.percentage)))
        .ratio(metric.ratio())
        .label(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_color_thresholds() {
        assert_eq!(gauge_color(100), Color::Green);
        assert_eq!(gauge_color(60), Color::Cyan);
        assert_eq!(gauge_color(25), Color::Yellow);
        assert_eq!(gauge_color(-10), Color::Red);
    }
}
