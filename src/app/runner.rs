use crate::adapters::{InMemoryLineRepository, InMemoryStationDirectory};
use crate::config::toml_config::{NetworkConfig, OperationConfig};
use crate::core::line_service::LineService;
use crate::core::{LineId, LineRepository, LineResponse, Result, SectionRequest, StationDirectory, StationId};
use crate::utils::error::{ErrorSeverity, SubwayError};
use serde::Serialize;
use std::collections::HashMap;

/// What happened to one line creation or one operation of the network file.
#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub step: usize,
    pub line: String,
    pub action: String,
    pub error: Option<String>,
}

impl OperationOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub network: String,
    pub lines: Vec<LineResponse>,
    pub outcomes: Vec<OperationOutcome>,
}

impl NetworkReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}

/// Replays a network file through a [`LineService`].
///
/// Rejected edits are recorded and skipped; only critical errors stop the run.
pub struct NetworkRunner<D: StationDirectory, R: LineRepository> {
    service: LineService<D, R>,
    line_ids: HashMap<String, LineId>,
}

impl NetworkRunner<InMemoryStationDirectory, InMemoryLineRepository> {
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        let directory = InMemoryStationDirectory::new(config.station_list())?;
        tracing::debug!("Registered {} stations", directory.len());
        Ok(Self::new(LineService::new(directory, InMemoryLineRepository::new())))
    }
}

impl<D: StationDirectory, R: LineRepository> NetworkRunner<D, R> {
    pub fn new(service: LineService<D, R>) -> Self {
        Self {
            service,
            line_ids: HashMap::new(),
        }
    }

    pub fn service(&self) -> &LineService<D, R> {
        &self.service
    }

    pub fn run(&mut self, config: &NetworkConfig) -> Result<NetworkReport> {
        tracing::info!(
            "Replaying network '{}': {} lines, {} operations",
            config.network.name,
            config.lines.len(),
            config.operations.len()
        );

        let mut outcomes = Vec::with_capacity(config.lines.len() + config.operations.len());
        let mut step = 0;

        for line in &config.lines {
            step += 1;
            let result = self.service.save_line(&line.to_request()).map(|created| {
                self.line_ids.insert(line.name.clone(), created.id);
            });
            outcomes.push(self.record(step, &line.name, "create_line".to_string(), result)?);
        }

        for operation in &config.operations {
            step += 1;
            let (action, result) = self.apply(operation);
            outcomes.push(self.record(step, operation.line(), action, result)?);
        }

        let mut lines = Vec::with_capacity(config.lines.len());
        for line in &config.lines {
            if let Some(id) = self.line_ids.get(&line.name) {
                lines.push(self.service.find_by_id(*id)?);
            }
        }

        let report = NetworkReport {
            network: config.network.name.clone(),
            lines,
            outcomes,
        };
        tracing::info!(
            "Replay finished: {} steps, {} rejected",
            report.outcomes.len(),
            report.failures()
        );
        Ok(report)
    }

    fn apply(&mut self, operation: &OperationConfig) -> (String, Result<()>) {
        match operation {
            OperationConfig::AddSection {
                line,
                up_station,
                down_station,
                distance,
            } => {
                let action = format!("add_section {} -> {} ({})", up_station, down_station, distance);
                let request = SectionRequest {
                    up_station_id: *up_station,
                    down_station_id: *down_station,
                    distance: *distance,
                };
                let result = self
                    .line_id(line)
                    .and_then(|id| self.service.add_section(id, &request).map(|_| ()));
                (action, result)
            }
            OperationConfig::RemoveStation { line, station } => {
                let action = format!("remove_station {}", station);
                let result = self
                    .line_id(line)
                    .and_then(|id| self.service.remove_section(id, StationId(*station)));
                (action, result)
            }
        }
    }

    fn line_id(&self, name: &str) -> Result<LineId> {
        self.line_ids
            .get(name)
            .copied()
            .ok_or_else(|| SubwayError::ValidationError {
                message: format!("line '{}' was not created", name),
            })
    }

    fn record(
        &self,
        step: usize,
        line: &str,
        action: String,
        result: Result<()>,
    ) -> Result<OperationOutcome> {
        let error = match result {
            Ok(()) => None,
            Err(e) if e.severity() == ErrorSeverity::Critical => return Err(e),
            Err(e) => {
                tracing::warn!("Step {} ({} on '{}') rejected: {}", step, action, line, e);
                Some(e.to_string())
            }
        };
        Ok(OperationOutcome {
            step,
            line: line.to_string(),
            action,
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = r#"
[network]
name = "Seoul"

[[stations]]
id = 1
name = "Yangjae"

[[stations]]
id = 2
name = "Pangyo"

[[stations]]
id = 3
name = "Cheonggyesan"

[[lines]]
name = "Shinbundang"
color = "bg-red-600"
up_station = 1
down_station = 2
distance = 100

[[operations]]
kind = "add_section"
line = "Shinbundang"
up_station = 1
down_station = 3
distance = 50

[[operations]]
kind = "remove_station"
line = "Bundang"
station = 3

[[operations]]
kind = "add_section"
line = "Shinbundang"
up_station = 1
down_station = 2
distance = 10
"#;

    #[test]
    fn test_run_records_rejections_and_keeps_going() {
        let config = NetworkConfig::from_toml_str(NETWORK).unwrap();
        let mut runner = NetworkRunner::from_config(&config).unwrap();
        let report = runner.run(&config).unwrap();

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.failures(), 2);
        assert!(report.outcomes[1].succeeded());
        assert!(report.outcomes[2].error.as_deref().unwrap().contains("Bundang"));
        assert!(report.outcomes[3].error.as_deref().unwrap().contains("Already registered"));

        assert_eq!(report.lines.len(), 1);
        assert_eq!(
            report.lines[0].station_names(),
            vec!["Yangjae", "Cheonggyesan", "Pangyo"]
        );
    }
}
