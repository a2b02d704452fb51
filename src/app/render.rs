use crate::app::runner::NetworkReport;
use crate::utils::error::{Result, SubwayError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StopRow<'a> {
    line: &'a str,
    position: usize,
    station_id: u64,
    station: &'a str,
    distance: u64,
    cumulative_distance: u64,
}

pub fn render(report: &NetworkReport, format: &str) -> Result<String> {
    match format {
        "text" => Ok(render_text(report)),
        "json" => Ok(serde_json::to_string_pretty(report)?),
        "csv" => render_csv(report),
        other => Err(SubwayError::InvalidConfigValueError {
            field: "output.format".to_string(),
            value: other.to_string(),
            reason: "Unsupported format".to_string(),
        }),
    }
}

fn render_text(report: &NetworkReport) -> String {
    let mut out = format!("Network: {}\n", report.network);

    for line in &report.lines {
        out.push_str(&format!(
            "\n{} ({}), {} stations, total distance {}\n",
            line.name,
            line.color,
            line.stations.len(),
            line.total_distance()
        ));
        for (i, stop) in line.stations.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("  {:>2}. {}\n", i + 1, stop.name));
            } else {
                out.push_str(&format!("  {:>2}. {}  +{}\n", i + 1, stop.name, stop.distance));
            }
        }
    }

    let failures = report.failures();
    out.push_str(&format!(
        "\nSteps: {} applied, {} rejected\n",
        report.outcomes.len() - failures,
        failures
    ));
    for outcome in report.outcomes.iter().filter(|o| !o.succeeded()) {
        out.push_str(&format!(
            "  step {} {} on '{}': {}\n",
            outcome.step,
            outcome.action,
            outcome.line,
            outcome.error.as_deref().unwrap_or_default()
        ));
    }
    out
}

/// One row per stop, in path order.
fn render_csv(report: &NetworkReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for line in &report.lines {
        let mut cumulative = 0;
        for (i, stop) in line.stations.iter().enumerate() {
            cumulative += stop.distance;
            writer.serialize(StopRow {
                line: &line.name,
                position: i + 1,
                station_id: stop.id.0,
                station: &stop.name,
                distance: stop.distance,
                cumulative_distance: cumulative,
            })?;
        }
    }
    let data = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
