//! Command handlers. Every failure is written to the output before it is
//! returned, so callers only need the result for the exit status.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lattice_common::{Error, Result};
use lattice_receptor::ClusterApi;

use crate::exit_handler::ExitHandler;
use crate::json_runner::{read_request_file, JsonRunner};
use crate::output::Output;
use crate::render::{render_detail, render_list};
use crate::view_model::{build_detail_view, build_list_view, DisplayZone};
use crate::visualizer::Visualizer;

pub struct AppCommands {
    api: Arc<dyn ClusterApi>,
    output: Output,
    exit: Arc<dyn ExitHandler>,
    runner: JsonRunner,
    zone: DisplayZone,
}

impl AppCommands {
    pub fn new(
        api: Arc<dyn ClusterApi>,
        output: Output,
        exit: Arc<dyn ExitHandler>,
        runner: JsonRunner,
    ) -> Self {
        Self {
            api,
            output,
            exit,
            runner,
            zone: DisplayZone::system(),
        }
    }

    pub fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    pub async fn list_apps(&mut self) -> Result<()> {
        let apps = match self.api.list_applications().await {
            Ok(apps) => apps,
            Err(err) => {
                self.output.say_line(&format!("Error listing apps: {err}"));
                return Err(err);
            }
        };

        match build_list_view(&apps) {
            Some(rows) => render_list(&mut self.output, &rows),
            None => self.output.say_line("No apps to display."),
        }
        self.output.flush();
        Ok(())
    }

    pub async fn app_status(&mut self, app_name: Option<&str>) -> Result<()> {
        let Some(name) = app_name.filter(|n| !n.is_empty()) else {
            return Err(self.usage("App Name required"));
        };

        match self.api.application_status(name).await {
            Ok(app) => {
                render_detail(&mut self.output, &build_detail_view(&app, self.zone));
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    pub async fn visualize_cells(&mut self, rate: Duration) -> Result<()> {
        Visualizer::new(self.api.as_ref(), &mut self.output, self.exit.as_ref())
            .run(rate)
            .await;
        Ok(())
    }

    pub async fn create_from_json(&mut self, path: Option<&Path>) -> Result<()> {
        let Some(path) = path else {
            return Err(self.usage("Path to JSON file required"));
        };

        let json = match read_request_file(path).await {
            Ok(json) => json,
            Err(err) => return self.fail(err),
        };

        self.output
            .say_line(&format!("Attempting to Create LRP from {}", path.display()));
        match self.runner.create_app_from_json(&json).await {
            Ok(request) => {
                self.output.say_line(&format!("Created LRP {}", request.name));
                self.output.flush();
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    fn usage(&mut self, message: &str) -> Error {
        self.output.incorrect_usage(message);
        self.output.flush();
        Error::Usage(message.to_string())
    }

    fn fail(&mut self, err: Error) -> Result<()> {
        self.output.say_line(&err.to_string());
        self.output.flush();
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{capture, ManualExit, SharedBuffer};
    use lattice_common::{ApplicationInfo, CellInfo, DesiredLrpCreateRequest};
    use lattice_receptor::{ApiCall, MemoryClusterApi};

    fn commands(api: &MemoryClusterApi) -> (AppCommands, SharedBuffer) {
        let (output, buffer) = capture();
        let api: Arc<dyn ClusterApi> = Arc::new(api.clone());
        let template = DesiredLrpCreateRequest {
            domain: "lattice".to_string(),
            instances: 1,
            ..Default::default()
        };
        let runner = JsonRunner::new(Arc::clone(&api), template);
        let cmds = AppCommands::new(api, output, Arc::new(ManualExit::default()), runner)
            .with_zone(DisplayZone::Utc);
        (cmds, buffer)
    }

    fn app(name: &str) -> ApplicationInfo {
        ApplicationInfo {
            process_guid: name.to_string(),
            desired_instances: 1,
            actual_running_instances: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_empty_prints_one_line() {
        let api = MemoryClusterApi::new();
        let (mut cmds, buffer) = commands(&api);

        cmds.list_apps().await.unwrap();
        assert_eq!(buffer.contents(), "No apps to display.\n");
    }

    #[tokio::test]
    async fn test_list_prints_header_and_rows() {
        let api = MemoryClusterApi::with_applications(vec![app("web"), app("worker")]);
        let (mut cmds, buffer) = commands(&api);

        cmds.list_apps().await.unwrap();
        let text = buffer.contents();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("<bold>App Name</bold>"));
        assert!(text.contains("<bold>worker</bold>"));
    }

    #[tokio::test]
    async fn test_list_error_is_reported() {
        let api = MemoryClusterApi::new();
        api.fail_queries(Some("receptor timed out")).await;
        let (mut cmds, buffer) = commands(&api);

        assert!(matches!(cmds.list_apps().await, Err(Error::Query(_))));
        assert_eq!(buffer.contents(), "Error listing apps: receptor timed out\n");
    }

    #[tokio::test]
    async fn test_status_requires_app_name() {
        let api = MemoryClusterApi::new();
        let (mut cmds, buffer) = commands(&api);

        assert!(matches!(cmds.app_status(None).await, Err(Error::Usage(_))));
        assert_eq!(buffer.contents(), "Incorrect Usage: App Name required\n");
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_status_not_found() {
        let api = MemoryClusterApi::new();
        let (mut cmds, buffer) = commands(&api);

        assert!(matches!(
            cmds.app_status(Some("ghost")).await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(buffer.contents(), "App ghost not found\n");
    }

    #[tokio::test]
    async fn test_status_renders_detail() {
        let api = MemoryClusterApi::with_applications(vec![app("web")]);
        let (mut cmds, buffer) = commands(&api);

        cmds.app_status(Some("web")).await.unwrap();
        let text = buffer.contents();
        assert!(text.contains("      <bold>web</bold>"));
        assert!(text.contains("<success>1/1</success>"));
        assert_eq!(api.calls().await, vec![ApiCall::ApplicationStatus("web".to_string())]);
    }

    #[tokio::test]
    async fn test_visualize_once() {
        let api = MemoryClusterApi::with_cells(vec![CellInfo::new("cell-1", 1, 0)]);
        let (mut cmds, buffer) = commands(&api);

        cmds.visualize_cells(Duration::ZERO).await.unwrap();
        assert!(buffer.contents().contains("cell-1: <success>•</success>"));
    }

    #[tokio::test]
    async fn test_create_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lrp.json");
        std::fs::write(&path, r#"{"name":"cool-web-app","dockerimagepath":"superfun/app"}"#)
            .unwrap();
        let api = MemoryClusterApi::new();
        let (mut cmds, buffer) = commands(&api);

        cmds.create_from_json(Some(&path)).await.unwrap();

        let text = buffer.contents();
        assert!(text.starts_with(&format!("Attempting to Create LRP from {}\n", path.display())));
        assert!(text.ends_with("Created LRP cool-web-app\n"));
        assert_eq!(api.desired_lrps().await[0].docker_image_path, "superfun/app");
    }

    #[tokio::test]
    async fn test_create_from_missing_file_stops_early() {
        let api = MemoryClusterApi::new();
        let (mut cmds, buffer) = commands(&api);

        let result = cmds
            .create_from_json(Some(Path::new("/definitely/not/here/lrp.json")))
            .await;

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(buffer.contents().contains("No such file or directory"));
        assert!(!buffer.contents().contains("Attempting"));
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_from_json_reports_upsert_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lrp.json");
        std::fs::write(&path, r#"{"name":"web"}"#).unwrap();
        let api = MemoryClusterApi::new();
        api.fail_upsert_domain(Some("Upsert Domain Error")).await;
        let (mut cmds, buffer) = commands(&api);

        assert!(cmds.create_from_json(Some(&path)).await.is_err());
        assert!(buffer.contents().ends_with("Upsert Domain Error\n"));
        assert!(api.desired_lrps().await.is_empty());
    }
}
