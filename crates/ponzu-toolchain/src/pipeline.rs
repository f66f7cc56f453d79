//! Linear build pipelines.
//!
//! A pipeline is an ordered list of [`Step`]s run once each. The first
//! failing step's error is returned unchanged and nothing after it runs.

use std::fmt;

use ponzu_common::config::PonzuConfig;
use ponzu_common::error::Result;
use ponzu_vendor::assemble;
use ponzu_vendor::merge::{Conflict, MergeReport};
use ponzu_vendor::package;

use crate::compile::{self, BuildRequest};
use crate::container::{self, ContainerBuildRequest};
use crate::image::{self, ImageTagSet};
use crate::process::{Invocation, ProcessRunner, ProcessStatus};

/// A named pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Rebuild the vendor tree from content and addons.
    AssembleVendor,
    /// Compile the binary on the host.
    Compile,
    /// Resolve the package identity and build the container binary.
    BuildForContainer,
    /// Build and tag the container image.
    BuildImage,
}

impl Step {
    /// Stable name used in logs and output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AssembleVendor => "assemble vendor tree",
            Self::Compile => "compile",
            Self::BuildForContainer => "build for container",
            Self::BuildImage => "build image",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observer for progress events. All methods default to no-ops.
pub trait Reporter {
    /// Called before a step begins.
    fn step_started(&self, _step: Step) {}

    /// Called for every merge conflict, as soon as the merge finishes.
    fn conflict(&self, _conflict: &Conflict) {}

    /// Called right before an external program is launched. The custom
    /// dependency command goes to [`Reporter::dependency_command`] instead.
    fn invocation(&self, _invocation: &Invocation) {}

    /// Called right before the custom dependency command runs.
    fn dependency_command(&self, _command: &str) {}
}

/// Reporter that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Options of the `docker` pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerOptions {
    /// Tags applied to the built image.
    pub tags: ImageTagSet,
    /// Replaces the default containerized dependency fetch and build.
    pub dependency_command: Option<String>,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Steps that ran, in order.
    pub completed: Vec<Step>,
    /// Combined vendor merge report.
    pub merge: MergeReport,
}

/// Forwards launches to the inner runner after notifying the reporter.
struct ReportingRunner<'a> {
    inner: &'a dyn ProcessRunner,
    reporter: &'a dyn Reporter,
}

impl ProcessRunner for ReportingRunner<'_> {
    fn run(&self, invocation: &Invocation) -> Result<ProcessStatus> {
        self.reporter.invocation(invocation);
        self.inner.run(invocation)
    }
}

/// An ordered, single-use sequence of steps for one project.
pub struct Pipeline<'a> {
    config: &'a PonzuConfig,
    runner: &'a dyn ProcessRunner,
    reporter: &'a dyn Reporter,
    steps: Vec<Step>,
    docker: DockerOptions,
}

impl<'a> Pipeline<'a> {
    /// Vendor assembly followed by host compilation.
    #[must_use]
    pub fn build(config: &'a PonzuConfig, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            config,
            runner,
            reporter: &SilentReporter,
            steps: vec![Step::AssembleVendor, Step::Compile],
            docker: DockerOptions::default(),
        }
    }

    /// Vendor assembly, container-side build, then image build.
    #[must_use]
    pub fn docker(
        config: &'a PonzuConfig,
        runner: &'a dyn ProcessRunner,
        options: DockerOptions,
    ) -> Self {
        Self {
            config,
            runner,
            reporter: &SilentReporter,
            steps: vec![Step::AssembleVendor, Step::BuildForContainer, Step::BuildImage],
            docker: options,
        }
    }

    /// Attaches a progress reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: &'a dyn Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Returns the planned steps.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs every step in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the failing step's error unchanged.
    pub fn run(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();
        for &step in &self.steps {
            tracing::info!(step = step.name(), "starting step");
            self.reporter.step_started(step);
            if let Err(err) = self.run_step(step, &mut report) {
                tracing::warn!(step = step.name(), error = %err, "step failed");
                return Err(err);
            }
            report.completed.push(step);
        }
        Ok(report)
    }

    fn run_step(&self, step: Step, report: &mut PipelineReport) -> Result<()> {
        let runner = ReportingRunner {
            inner: self.runner,
            reporter: self.reporter,
        };
        let config = self.config;

        match step {
            Step::AssembleVendor => {
                let merged = assemble::assemble(&config.layout())?;
                for conflict in &merged.conflicts {
                    self.reporter.conflict(conflict);
                }
                report.merge.absorb(merged);
                Ok(())
            }
            Step::Compile => compile::build(
                &runner,
                &BuildRequest::from_config(config),
                &config.project_dir,
            ),
            Step::BuildForContainer => {
                let identity = package::resolve_package_identity(config)?;
                let request = ContainerBuildRequest::new(
                    self.docker.dependency_command.as_deref(),
                    identity,
                    &config.project_dir,
                );
                if let Some(command) = request.dependency_command() {
                    self.reporter.dependency_command(command);
                    return container::build_for_container(self.runner, config, &request);
                }
                container::build_for_container(&runner, config, &request)
            }
            Step::BuildImage => image::build_image(&runner, config, &self.docker.tags),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use ponzu_common::error::PonzuError;

    use super::*;
    use crate::process::testing::RecordingRunner;

    #[derive(Default)]
    struct StepLog(RefCell<Vec<Step>>);

    impl Reporter for StepLog {
        fn step_started(&self, step: Step) {
            self.0.borrow_mut().push(step);
        }
    }

    #[derive(Default)]
    struct LaunchLog {
        dependency: RefCell<Vec<String>>,
        invocations: RefCell<Vec<String>>,
    }

    impl Reporter for LaunchLog {
        fn invocation(&self, invocation: &Invocation) {
            self.invocations.borrow_mut().push(invocation.to_string());
        }

        fn dependency_command(&self, command: &str) {
            self.dependency.borrow_mut().push(command.to_string());
        }
    }

    #[test]
    fn build_pipeline_plans_assemble_then_compile() {
        let config = PonzuConfig::new("/proj");
        let runner = RecordingRunner::default();
        let pipeline = Pipeline::build(&config, &runner);
        assert_eq!(pipeline.steps(), [Step::AssembleVendor, Step::Compile]);
    }

    #[test]
    fn docker_pipeline_plans_three_steps() {
        let config = PonzuConfig::new("/proj");
        let runner = RecordingRunner::default();
        let pipeline = Pipeline::docker(&config, &runner, DockerOptions::default());
        assert_eq!(
            pipeline.steps(),
            [Step::AssembleVendor, Step::BuildForContainer, Step::BuildImage]
        );
    }

    #[test]
    fn unresolvable_package_stops_before_any_launch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = PonzuConfig::new(dir.path()).with_workspace_root("/elsewhere");
        let runner = RecordingRunner::default();
        let log = StepLog::default();

        let err = Pipeline::docker(&config, &runner, DockerOptions::default())
            .with_reporter(&log)
            .run()
            .expect_err("outside workspace");

        assert!(matches!(err, PonzuError::NotInWorkspace { .. }));
        assert!(runner.calls.borrow().is_empty());
        assert_eq!(
            *log.0.borrow(),
            [Step::AssembleVendor, Step::BuildForContainer]
        );
    }

    #[test]
    fn dependency_command_is_reported_on_its_own() {
        let ws = tempfile::tempdir().expect("tempdir");
        let project = ws.path().join("src/example.com/proj");
        std::fs::create_dir_all(&project).expect("mkdir");
        let config = PonzuConfig::new(&project).with_workspace_root(ws.path());
        let runner = RecordingRunner::default();
        let log = LaunchLog::default();
        let options = DockerOptions {
            tags: ImageTagSet::default(),
            dependency_command: Some("make deps".into()),
        };

        let _ = Pipeline::docker(&config, &runner, options)
            .with_reporter(&log)
            .run()
            .expect("docker");

        assert_eq!(*log.dependency.borrow(), ["make deps"]);
        assert_eq!(
            *log.invocations.borrow(),
            ["docker build -f deployment/docker/Dockerfile.prebuilt ."]
        );
        assert_eq!(runner.calls.borrow().len(), 2);
    }

    #[test]
    fn step_names_are_stable() {
        assert_eq!(Step::AssembleVendor.to_string(), "assemble vendor tree");
        assert_eq!(Step::BuildImage.name(), "build image");
    }
}
