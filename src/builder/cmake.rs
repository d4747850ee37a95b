//! CMake driver.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::builder::definitions::BuildDefinitions;
use crate::builder::orchestrator::BuildTool;
use crate::core::settings::BuildType;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Drives the `cmake` executable, one process per phase.
#[derive(Debug, Clone)]
pub struct CMakeTool {
    program: PathBuf,
    build_type: BuildType,
    generator: Option<String>,
    jobs: Option<usize>,
    verbose: bool,
}

impl CMakeTool {
    /// Locate CMake on PATH.
    pub fn new(build_type: BuildType) -> Result<Self> {
        let Some(program) = find_cmake() else {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build SQLite.\n\
                 Install CMake and ensure it's in your PATH, or set CMAKE."
            );
        };
        Ok(Self::with_program(program, build_type))
    }

    /// Use an explicit CMake executable.
    pub fn with_program(program: impl Into<PathBuf>, build_type: BuildType) -> Self {
        CMakeTool {
            program: program.into(),
            build_type,
            generator: None,
            jobs: None,
            verbose: false,
        }
    }

    pub fn generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn configure_command(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        definitions: &BuildDefinitions,
    ) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program)
            .arg("-S")
            .arg(source_dir)
            .arg("-B")
            .arg(build_dir);

        if let Some(ref generator) = self.generator {
            cmd = cmd.arg("-G").arg(generator);
        }

        // Ignored by multi-config generators, which take --config instead
        cmd = cmd.arg(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));

        cmd.args(definitions.to_cmake_args())
    }

    fn build_command(&self, build_dir: &Path) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program)
            .arg("--build")
            .arg(build_dir)
            .arg("--config")
            .arg(self.build_type.as_str());

        if let Some(jobs) = self.jobs {
            cmd = cmd.arg("--parallel").arg(jobs.to_string());
        }

        if self.verbose {
            cmd = cmd.arg("--verbose");
        }

        cmd
    }

    fn install_command(&self, build_dir: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg("--install")
            .arg(build_dir)
            .arg("--config")
            .arg(self.build_type.as_str())
    }
}

impl BuildTool for CMakeTool {
    fn name(&self) -> &str {
        "cmake"
    }

    fn configure(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        definitions: &BuildDefinitions,
    ) -> Result<()> {
        tracing::info!("Configuring CMake project");
        self.configure_command(source_dir, build_dir, definitions)
            .exec_and_check()?;
        Ok(())
    }

    fn build(&self, build_dir: &Path) -> Result<()> {
        tracing::info!("Building CMake project");
        self.build_command(build_dir).exec_and_check()?;
        Ok(())
    }

    fn install(&self, build_dir: &Path) -> Result<()> {
        tracing::info!("Installing CMake project");
        self.install_command(build_dir).exec_and_check()?;
        Ok(())
    }
}
