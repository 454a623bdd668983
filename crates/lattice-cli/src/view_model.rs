//! Display model for application, instance and cell reports. No I/O.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use lattice_common::{ApplicationInfo, CellInfo, InstanceInfo, InstanceState};

use crate::terminal::Tone;

/// Glyph drawn once per hosted instance in the distribution view.
pub const INSTANCE_GLYPH: &str = "•";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S (%Z)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styled {
    pub text: String,
    pub tone: Tone,
}

impl Styled {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }
}

/// Timezone used for instance timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// System clock; `%Z` renders as a numeric offset.
    #[default]
    Local,
    Utc,
    /// IANA zone; `%Z` renders as its abbreviation (`PST`, `CET`).
    Named(Tz),
}

impl DisplayZone {
    /// The zone named by `TZ`, else the system's IANA zone, else `Local`.
    pub fn system() -> Self {
        std::env::var("TZ")
            .ok()
            .and_then(|name| parse_zone(&name))
            .or_else(|| {
                iana_time_zone::get_timezone()
                    .ok()
                    .and_then(|name| parse_zone(&name))
            })
            .map(DisplayZone::Named)
            .unwrap_or_default()
    }
}

/// Accepts the POSIX `:Area/City` spelling as well as the bare name.
fn parse_zone(name: &str) -> Option<Tz> {
    name.trim_start_matches(':').parse().ok()
}

// ── list view ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRow {
    pub name: String,
    pub instances: Styled,
    pub disk_mb: String,
    pub memory_mb: String,
    pub route: String,
}

/// One row per application, in input order. `None` means there is nothing
/// to render.
pub fn build_list_view(applications: &[ApplicationInfo]) -> Option<Vec<AppRow>> {
    if applications.is_empty() {
        return None;
    }
    Some(
        applications
            .iter()
            .map(|app| AppRow {
                name: app.process_guid.clone(),
                instances: instances_ratio(app),
                disk_mb: app.disk_mb.to_string(),
                memory_mb: app.memory_mb.to_string(),
                route: display_route(app),
            })
            .collect(),
    )
}

/// `running/desired`: success when equal (including 0/0), danger when
/// nothing runs, warning otherwise.
pub fn instances_ratio(app: &ApplicationInfo) -> Styled {
    let text = format!(
        "{}/{}",
        app.actual_running_instances, app.desired_instances
    );
    let tone = if app.actual_running_instances == app.desired_instances {
        Tone::Success
    } else if app.actual_running_instances == 0 {
        Tone::Danger
    } else {
        Tone::Warning
    };
    Styled::new(text, tone)
}

/// Hostnames of a single port, `"a, b => 8080"`. Empty when the app has no
/// routes.
pub fn display_route(app: &ApplicationInfo) -> String {
    if app.routes.is_empty() {
        return String::new();
    }
    let Some(port) = app
        .ports
        .first()
        .copied()
        .or_else(|| app.routes.keys().next().copied())
    else {
        return String::new();
    };
    match app.routes.get(&port) {
        Some(hostnames) if !hostnames.is_empty() => {
            format!("{} => {}", hostnames.join(", "), port)
        }
        _ => String::new(),
    }
}

// ── detail view ─────────────────────────────────────────────────────

/// A `label value` line; continuation lines have an empty label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLine {
    pub label: String,
    pub value: Styled,
}

impl DetailLine {
    fn new(label: &str, value: Styled) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }

    fn plain(label: &str, value: impl Into<String>) -> Self {
        Self::new(label, Styled::plain(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceBlock {
    pub index: u32,
    pub state: Styled,
    pub lines: Vec<DetailLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub summary: Vec<DetailLine>,
    /// `NAME="VALUE"` lines in declaration order.
    pub environment: Vec<String>,
    pub instances: Vec<InstanceBlock>,
}

impl DetailView {
    pub fn lines(&self) -> impl Iterator<Item = &DetailLine> {
        self.summary
            .iter()
            .chain(self.instances.iter().flat_map(|block| block.lines.iter()))
    }
}

pub fn build_detail_view(app: &ApplicationInfo, zone: DisplayZone) -> DetailView {
    let mut summary = vec![
        DetailLine::new("Instances", instances_ratio(app)),
        DetailLine::plain("Stack", app.stack.clone()),
        DetailLine::plain("Start Timeout", app.start_timeout.to_string()),
        DetailLine::plain("DiskMB", app.disk_mb.to_string()),
        DetailLine::plain("MemoryMB", app.memory_mb.to_string()),
        DetailLine::plain("CPUWeight", app.cpu_weight.to_string()),
        DetailLine::plain(
            "Ports",
            app.ports
                .iter()
                .map(u16::to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
    ];

    let mut label = "Routes";
    for (port, hostnames) in &app.routes {
        for hostname in hostnames {
            summary.push(DetailLine::new(
                label,
                Styled::new(format!("{hostname} => {port}"), Tone::Info),
            ));
            label = "";
        }
    }

    if !app.annotation.is_empty() {
        summary.push(DetailLine::plain("Annotation", app.annotation.clone()));
    }

    DetailView {
        title: app.process_guid.clone(),
        summary,
        environment: app
            .environment_variables
            .iter()
            .map(|var| format!("{}=\"{}\"", var.name, var.value))
            .collect(),
        instances: app
            .actual_instances
            .iter()
            .map(|instance| instance_block(instance, zone))
            .collect(),
    }
}

/// State label coloured by lifecycle; a placement error on a live slot is
/// always danger.
pub fn instance_state(instance: &InstanceInfo) -> Styled {
    let tone = match instance.state {
        InstanceState::Crashed => Tone::Danger,
        _ if instance.placement_error().is_some() => Tone::Danger,
        InstanceState::Running => Tone::Success,
        InstanceState::Claimed | InstanceState::Unclaimed => Tone::Warning,
        InstanceState::Unknown => Tone::Plain,
    };
    Styled::new(instance.state.as_str(), tone)
}

fn instance_block(instance: &InstanceInfo, zone: DisplayZone) -> InstanceBlock {
    let crashed = instance.state == InstanceState::Crashed;
    let mut lines = Vec::new();

    match instance.placement_error() {
        None if !crashed => {
            lines.push(DetailLine::plain("InstanceGuid", instance.instance_guid.clone()));
            lines.push(DetailLine::plain("Cell ID", instance.cell_id.clone()));
            lines.push(DetailLine::plain("Ip", instance.ip.clone()));
            lines.push(DetailLine::plain(
                "Port Mapping",
                instance
                    .ports
                    .iter()
                    .map(|p| format!("{}:{}", p.host_port, p.container_port))
                    .collect::<Vec<_>>()
                    .join(";"),
            ));
            lines.push(DetailLine::plain("Since", format_since(instance.since, zone)));
        }
        Some(error) if !crashed => {
            lines.push(DetailLine::plain("Placement Error", error));
        }
        _ => {}
    }
    lines.push(DetailLine::plain("Crash Count", instance.crash_count.to_string()));

    InstanceBlock {
        index: instance.index,
        state: instance_state(instance),
        lines,
    }
}

pub fn format_since(nanos: i64, zone: DisplayZone) -> String {
    let at: DateTime<Utc> = DateTime::from_timestamp_nanos(nanos);
    match zone {
        DisplayZone::Utc => at.format(TIMESTAMP_FORMAT).to_string(),
        DisplayZone::Local => at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
        DisplayZone::Named(tz) => at.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string(),
    }
}

// ── cell distribution ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRow {
    pub cell_id: String,
    pub missing: Option<Styled>,
    /// `empty`, or running glyphs followed by claimed glyphs.
    pub load: Vec<Styled>,
}

/// Exactly one row per cell, in input order.
pub fn build_cell_distribution(cells: &[CellInfo]) -> Vec<CellRow> {
    cells.iter().map(cell_row).collect()
}

fn cell_row(cell: &CellInfo) -> CellRow {
    let mut load = Vec::new();
    if cell.running_instances == 0 && cell.claimed_instances == 0 && !cell.missing {
        load.push(Styled::new("empty", Tone::Danger));
    } else {
        if cell.running_instances > 0 {
            load.push(Styled::new(
                INSTANCE_GLYPH.repeat(cell.running_instances as usize),
                Tone::Success,
            ));
        }
        if cell.claimed_instances > 0 {
            load.push(Styled::new(
                INSTANCE_GLYPH.repeat(cell.claimed_instances as usize),
                Tone::Warning,
            ));
        }
    }

    CellRow {
        cell_id: cell.cell_id.clone(),
        missing: cell
            .missing
            .then(|| Styled::new("[MISSING]", Tone::Danger)),
        load,
    }
}
