use ratatui::widgets::TableState;
use tracing::warn;
use wellness_core::{DashboardDto, KeyValueStore, MetricKind, WellnessService};

pub struct App<S: KeyValueStore> {
    pub service: WellnessService<S>,
    pub snapshot: DashboardDto,
    pub state: TableState,
    pub message: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(service: WellnessService<S>) -> App<S> {
        let snapshot = service.snapshot();
        let mut state = TableState::default();
        state.select(Some(0));
        App {
            service,
            snapshot,
            state,
            message: None,
        }
    }

    pub fn selected_kind(&self) -> MetricKind {
        let i = self.state.selected().unwrap_or(0);
        MetricKind::ALL[i.min(MetricKind::ALL.len() - 1)]
    }

    pub fn next(&mut self) {
        let i = match self.state.selected() {
            Some(i) if i + 1 < MetricKind::ALL.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let i = match self.state.selected() {
            Some(0) | None => MetricKind::ALL.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn quick_add(&mut self, undo: bool) {
        let kind = self.selected_kind();
        let step = self.service.quick_add_step(kind);
        match self.service.quick_add(kind, undo).map(|m| m.percentage) {
            Ok(percentage) => {
                let sign = if undo { '-' } else { '+' };
                self.message = Some(format!("{} {}{} ({}%)", kind.label(), sign, step, percentage));
            }
            Err(e) => self.report(e),
        }
        self.reload();
    }

    pub fn reset(&mut self) {
        match self.service.reset() {
            Ok(()) => self.message = Some("All metrics reset".to_string()),
            Err(e) => self.report(e),
        }
        self.reload();
    }

    fn report(&mut self, e: anyhow::Error) {
        warn!(error = %e, "could not save metrics");
        self.message = Some(format!("Save failed: {}", e));
    }

    fn reload(&mut self) {
        self.snapshot = self.service.snapshot();
    }
}
