use chrono::Utc;
use serde::Serialize;

use crate::application::{CheckError, CheckReport};
use crate::domain::{CheckState, CommandKind, ObjectKind, Resource, Thresholds};

use super::OutputFormat;

/// Resource as exposed in the JSON document
#[derive(Debug, Serialize)]
struct ResourceView<'a> {
    name: &'a str,
    total: f64,
    free: f64,
    free_percent: Option<f64>,
}

impl<'a> From<&'a Resource> for ResourceView<'a> {
    fn from(resource: &'a Resource) -> Self {
        Self {
            name: &resource.name,
            total: resource.total,
            free: resource.free,
            free_percent: resource.free_percent().map(|p| (p * 100.0).round() / 100.0),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    timestamp: String,
    state: CheckState,
    exit_code: u8,
    command: CommandKind,
    object_kind: ObjectKind,
    thresholds: Thresholds,
    selected: ResourceView<'a>,
    resources: Vec<ResourceView<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonError {
    timestamp: String,
    state: CheckState,
    exit_code: u8,
    error: String,
}

/// Render a finished check in the requested format
pub fn render(report: &CheckReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Nagios => nagios_line(report),
        OutputFormat::Json => {
            let document = JsonReport {
                timestamp: Utc::now().to_rfc3339(),
                state: report.state,
                exit_code: report.state.exit_code(),
                command: report.command,
                object_kind: report.object_kind,
                thresholds: report.thresholds,
                selected: ResourceView::from(&report.selected),
                resources: report.resources.iter().map(ResourceView::from).collect(),
            };
            encode(&document)
        }
    }
}

/// Render a failed check; the state is always UNKNOWN except for the exit code
pub fn render_error(err: &CheckError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Nagios => format!("{}: {}", CheckState::Unknown, err),
        OutputFormat::Json => encode(&JsonError {
            timestamp: Utc::now().to_rfc3339(),
            state: CheckState::Unknown,
            exit_code: err.exit_code(),
            error: err.to_string(),
        }),
    }
}

fn encode(document: &impl Serialize) -> String {
    serde_json::to_string(document)
        .unwrap_or_else(|e| format!("{}: cannot encode report: {}", CheckState::Unknown, e))
}

fn nagios_line(report: &CheckReport) -> String {
    let selected = &report.selected;
    let percent = match selected.free_percent() {
        Some(_) => format!("{}%", selected.free_percent_display()),
        None => "undefined (total capacity is zero)".to_string(),
    };
    let mut line = format!(
        "{}: {} {} total={:.6} free={:.6} free_percent={}",
        report.state,
        report.object_kind.label(),
        selected.name,
        selected.total,
        selected.free,
        percent,
    );

    let perfdata: Vec<String> = report
        .resources
        .iter()
        .filter_map(|r| perfdata(r, &report.thresholds))
        .collect();
    if !perfdata.is_empty() {
        line.push_str(" | ");
        line.push_str(&perfdata.join(" "));
    }

    line
}

/// `'label'=value%;warn;crit;min;max`; the ranges alert inside `@0:<free>`, inclusive like the state
fn perfdata(resource: &Resource, thresholds: &Thresholds) -> Option<String> {
    resource.free_percent()?;
    Some(format!(
        "'{}'={}%;@0:{};@0:{};0;100",
        resource.name.replace('\'', "''"),
        resource.free_percent_display(),
        thresholds.warning_free(),
        thresholds.critical_free(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(state: CheckState, resources: Vec<Resource>) -> CheckReport {
        CheckReport {
            command: CommandKind::Vmfs,
            object_kind: ObjectKind::Datastore,
            state,
            thresholds: Thresholds::default(),
            selected: resources[0].clone(),
            resources,
        }
    }

    #[test]
    fn test_nagios_line_for_datastore() {
        let report = report(CheckState::Ok, vec![Resource::new("ds2", 2000.0, 500.0)]);

        assert_eq!(
            render(&report, OutputFormat::Nagios),
            "OK: datastore ds2 total=2000.000000 free=500.000000 free_percent=25.00% | 'ds2'=25.00%;@0:15;@0:10;0;100"
        );
    }

    #[test]
    fn test_nagios_line_lists_every_host() {
        let mut report = report(
            CheckState::Critical,
            vec![Resource::new("esx2", 8000.0, 400.0), Resource::new("esx'1", 8000.0, 4000.0)],
        );
        report.command = CommandKind::Cpu;
        report.object_kind = ObjectKind::HostSystem;

        let line = render(&report, OutputFormat::Nagios);
        assert!(line.starts_with("CRITICAL: host esx2 total=8000.000000 free=400.000000 free_percent=5.00%"));
        assert!(line.ends_with("| 'esx2'=5.00%;@0:15;@0:10;0;100 'esx''1'=50.00%;@0:15;@0:10;0;100"));
    }

    #[test]
    fn test_warning_boundary_is_inside_perfdata_range() {
        let thresholds = Thresholds::default();
        let resource = Resource::new("ds", 100.0, 15.0);
        let state = thresholds.classify(resource.free_percent());
        assert_eq!(state, CheckState::Warning);

        let report = report(state, vec![resource]);
        assert_eq!(
            render(&report, OutputFormat::Nagios),
            "WARNING: datastore ds total=100.000000 free=15.000000 free_percent=15.00% | 'ds'=15.00%;@0:15;@0:10;0;100"
        );
    }

    #[test]
    fn test_nagios_line_for_zero_capacity() {
        let report = report(CheckState::Unknown, vec![Resource::new("empty", 0.0, 0.0)]);

        assert_eq!(
            render(&report, OutputFormat::Nagios),
            "UNKNOWN: datastore empty total=0.000000 free=0.000000 free_percent=undefined (total capacity is zero)"
        );
    }

    #[test]
    fn test_json_report() {
        let report = report(CheckState::Ok, vec![Resource::new("ds2", 2000.0, 500.0)]);

        let value: serde_json::Value = serde_json::from_str(&render(&report, OutputFormat::Json)).unwrap();
        assert_eq!(value["state"], "OK");
        assert_eq!(value["exit_code"], 0);
        assert_eq!(value["command"], "VMFS");
        assert_eq!(value["selected"]["free_percent"], 25.0);
        assert_eq!(value["thresholds"]["warning"], 85);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_render_error() {
        let err = CheckError::NotFound {
            kind: ObjectKind::Datastore,
            name: "ds9".to_string(),
        };

        assert_eq!(
            render_error(&err, OutputFormat::Nagios),
            "UNKNOWN: No datastore with name ds9 found."
        );

        let value: serde_json::Value = serde_json::from_str(&render_error(&err, OutputFormat::Json)).unwrap();
        assert_eq!(value["exit_code"], 1);
        assert_eq!(value["error"], "No datastore with name ds9 found.");
    }
}
