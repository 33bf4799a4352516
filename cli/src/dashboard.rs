use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use wellness_core::{DashboardDto, MetricKind};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    label: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    bar: String,
    #[tabled(rename = "%")]
    percentage: String,
}

/// Renders an amount with the precision that suits its unit.
pub fn format_amount(kind: MetricKind, value: f64) -> String {
    match kind {
        MetricKind::Water | MetricKind::Sleep => format!("{:.2} {}", value, kind.unit()),
        _ => format!("{:.0} {}", value, kind.unit()),
    }
}

fn progress_bar(ratio: f64) -> String {
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn show_dashboard(snapshot: &DashboardDto) {
    println!(
        "\n\x1b[1;36mWellness for {}\x1b[0m (overall {}%)",
        snapshot.date, snapshot.overall_percentage
    );

    let rows: Vec<MetricRow> = snapshot
        .metrics
        .iter()
        .map(|m| MetricRow {
            label: m.label.clone(),
            current: format_amount(m.kind, m.current),
            target: format_amount(m.kind, m.target),
            bar: progress_bar(m.ratio()),
            percentage: m.percentage.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_BRIGHT_WHITE));
    println!("{}", table);

    if let Some(last) = &snapshot.last_reset {
        println!("Last reset: {}", last);
    }
}
