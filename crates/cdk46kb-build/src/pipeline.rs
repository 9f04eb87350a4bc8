//! Build pipeline orchestrator.
//!
//! Runs the stages in order against one configuration:
//!   stats → network → centrality → organic → subtype assets →
//!   subtype networks → styles → mindmap → archive
//!
//! The pipeline is non-destructive: a missing input is reported and the run
//! moves on. Only an unwritable output ends it early.

use std::fmt;

use cdk46kb_config::Config;
use tracing::info;

use crate::archive::stage_archive;
use crate::assets::{stage_centrality, stage_network, stage_organic, stage_stats, stage_subtype_assets};
use crate::error::Result;
use crate::mindmap::stage_mindmap;
use crate::report::StepReport;
use crate::styles::stage_styles;
use crate::subtype::{SubtypeNetworkBuilder, SubtypeOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub steps: Vec<StepReport>,
    pub subtypes: Vec<SubtypeOutcome>,
}

impl BuildSummary {
    pub fn skipped(&self) -> usize {
        self.steps.iter().filter(|s| !s.is_done()).count()
            + self.subtypes.iter().filter(|s| !s.is_merged()).count()
    }

    fn extend(&mut self, steps: Vec<StepReport>) {
        self.steps.extend(steps);
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{}", step)?;
        }
        for outcome in &self.subtypes {
            writeln!(f, "[subtypes] {}", outcome)?;
        }
        write!(
            f,
            "{} items done, {} skipped",
            self.steps.iter().filter(|s| s.is_done()).count()
                + self.subtypes.iter().filter(|s| s.is_merged()).count(),
            self.skipped()
        )
    }
}

/// Merge every augmented subtype network.
pub fn run_subtypes(config: &Config) -> Result<Vec<SubtypeOutcome>> {
    let plans = config.subtype_plans()?;
    SubtypeNetworkBuilder::new(config.build.edge_identity).build_all(&plans)
}

pub fn run_all(config: &Config) -> Result<BuildSummary> {
    config.validate()?;
    let paths = &config.paths;
    info!(
        raw_dir = %paths.raw_dir.display(),
        data_dir = %paths.data_dir.display(),
        "Starting data build"
    );

    let mut summary = BuildSummary::default();
    summary.extend(stage_stats(paths)?);
    summary.extend(stage_network(paths)?);
    summary.extend(stage_centrality(paths)?);
    summary.extend(stage_organic(paths)?);
    summary.extend(stage_subtype_assets(config)?);
    summary.subtypes = run_subtypes(config)?;
    summary.extend(stage_styles(paths)?);
    summary.extend(stage_mindmap(paths)?);
    // last, so the bundle holds this run's statistics files
    summary.extend(stage_archive(config)?);

    info!(skipped = summary.skipped(), "Data build finished");
    Ok(summary)
}
