//! Command implementations.
//!
//! Each subcommand returns a process exit code: 0 for success, 1 when
//! validation fails, the run fails, the batch has failures, or the
//! simulation predicts anything but success.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::artifact::FsArtifacts;
use crate::batch::{BatchOptions, BatchRunner};
use crate::dataset::Dataset;
use crate::error::{GreenlineError, Result};
use crate::exec::{StepRunner, WorkflowResult};
use crate::score::builtin_scorers;
use crate::session::scripted::{load_frames, ScriptedSessionFactory};
use crate::session::SessionFactory;
use crate::sim::simulate;
use crate::validate::{ValidationResult, WorkflowValidator};
use crate::workflow::{load_workflow, WorkflowDefinition};

use super::args::{Cli, Commands, RunArgs, SimulateArgs, ValidateArgs};

/// Route a parsed CLI invocation to its command.
pub fn dispatch(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Commands::Run(args) => run_command(args),
        Commands::Validate(args) => validate_command(args),
        Commands::Simulate(args) => simulate_command(args),
    }
}

fn run_command(args: &RunArgs) -> Result<i32> {
    let workflow = load_workflow(&args.workflow)?;
    println!(
        "Loaded workflow '{}' ({} steps)",
        workflow.name,
        workflow.steps.len()
    );
    let environment = args.env.as_deref().or(workflow.environment.as_deref());
    if let Some(env) = environment {
        debug!("target environment: {}", env);
    }

    let dataset = match &args.data {
        Some(path) => Some(Dataset::load_csv(path)?),
        None => None,
    };

    let validation = validate_against(&workflow, dataset.as_ref());
    print_warnings(&validation);
    if !validation.is_valid() {
        print_errors(&validation);
        return Ok(1);
    }

    let tolerance = workflow.resolved_tolerance()?;
    if tolerance.requires_approval {
        warn!("tolerance requires human approval; run 'greenline simulate' first");
        println!(
            "{} this workflow requires approval; simulate it before live runs",
            style("note:").yellow()
        );
    }

    let screens = args.screens.as_ref().ok_or_else(|| GreenlineError::Session {
        message: "no transport configured; pass --screens <frames file> to run against scripted \
                  frames"
            .into(),
    })?;
    let frames = load_frames(screens)?;
    let factory: Arc<dyn SessionFactory> = Arc::new(ScriptedSessionFactory::new(frames));

    let batch_rows = dataset.as_ref().map_or(0, Dataset::len);
    if batch_rows > 1 {
        run_batch(args, &workflow, dataset.unwrap(), factory)
    } else {
        run_single(args, &workflow, dataset, factory)
    }
}

fn run_single(
    args: &RunArgs,
    workflow: &WorkflowDefinition,
    dataset: Option<Dataset>,
    factory: Arc<dyn SessionFactory>,
) -> Result<i32> {
    let row = dataset
        .as_ref()
        .and_then(Dataset::first_row)
        .cloned()
        .unwrap_or_default();

    let login = workflow
        .login_step()
        .ok_or_else(|| GreenlineError::InvalidStep {
            message: "workflow requires a LOGIN step".into(),
        })?;

    let artifact_dir = args.artifacts.join(workflow.path_stem());
    let sink = FsArtifacts::create(&artifact_dir)?;
    let session = factory.open(login)?;

    let start = Instant::now();
    let mut runner = StepRunner::new(session, &sink, &row);
    let outcome = runner.run_workflow(workflow);
    let latency_ms = start.elapsed().as_millis() as u64;

    let result = match outcome {
        Ok(()) => {
            let _ = runner.disconnect();
            WorkflowResult::success("run", latency_ms, artifact_dir)
        }
        Err(e) => WorkflowResult::failure("run", latency_ms, e),
    };

    println!("{}", result.summary());
    print_scores(&result, workflow)?;

    Ok(if result.is_success() { 0 } else { 1 })
}

fn run_batch(
    args: &RunArgs,
    workflow: &WorkflowDefinition,
    dataset: Dataset,
    factory: Arc<dyn SessionFactory>,
) -> Result<i32> {
    let rows = dataset.into_rows();
    println!("Batch mode: {} rows", rows.len());

    let bar = ProgressBar::new(rows.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let runner = BatchRunner::new(
        factory,
        BatchOptions {
            row_timeout: Duration::from_secs(args.row_timeout),
            max_concurrent: args.max_concurrent,
            artifact_root: args.artifacts.clone(),
        },
    );

    let metrics = runner.execute_all_with_progress(workflow, rows, |result| {
        bar.set_message(result.summary());
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    println!("{}", metrics.render());
    Ok(if metrics.failure_count() > 0 { 1 } else { 0 })
}

fn validate_command(args: &ValidateArgs) -> Result<i32> {
    let workflow = load_workflow(&args.workflow)?;
    println!(
        "Loaded workflow '{}' ({} steps)",
        workflow.name,
        workflow.steps.len()
    );

    let dataset = match &args.data {
        Some(path) => Some(Dataset::load_csv(path)?),
        None => None,
    };

    let result = validate_against(&workflow, dataset.as_ref());

    if result.is_valid() {
        println!("{} workflow is valid", style("✓").green());
    } else {
        print_errors(&result);
    }
    print_warnings(&result);

    Ok(if result.is_valid() { 0 } else { 1 })
}

fn simulate_command(args: &SimulateArgs) -> Result<i32> {
    let workflow = load_workflow(&args.workflow)?;
    let tolerance = workflow.resolved_tolerance()?;

    let row = match &args.data {
        Some(path) => Dataset::load_csv(path)?
            .first_row()
            .cloned()
            .unwrap_or_default(),
        None => Default::default(),
    };

    let simulation = simulate(&workflow, &row, &tolerance);

    println!("Simulation of '{}':", workflow.name);
    for step in &simulation.steps {
        let mark = match step.prediction {
            crate::sim::StepPrediction::Success => style("✓").green(),
            crate::sim::StepPrediction::Timeout => style("⏱").red(),
            crate::sim::StepPrediction::Error => style("✗").red(),
        };
        print!("  {} step {} {}", mark, step.step_index, step.step_name);
        match &step.warning {
            Some(warning) => println!(" — {}", style(warning).yellow()),
            None => println!(),
        }
    }

    for warning in &simulation.warnings {
        println!("  {} {}", style("⚠").yellow(), warning);
    }

    println!("Predicted outcome: {}", simulation.predicted_outcome);
    if simulation.predict_success() {
        if tolerance.requires_approval {
            println!(
                "{} prediction clean; human approval still required before live execution",
                style("approval:").cyan()
            );
        } else {
            println!("{} approved for execution", style("✓").green());
        }
        Ok(0)
    } else {
        println!("{} do not run without fixing the above", style("✗").red());
        Ok(1)
    }
}

/// Structural validation plus the parameter-reference pass when a
/// dataset is available.
fn validate_against(
    workflow: &WorkflowDefinition,
    dataset: Option<&Dataset>,
) -> ValidationResult {
    let validator = WorkflowValidator::new();
    match dataset {
        Some(ds) => {
            let columns: HashSet<String> = ds.columns().iter().cloned().collect();
            validator.validate_with_columns(workflow, &columns)
        }
        None => validator.validate(workflow),
    }
}

fn print_errors(result: &ValidationResult) {
    for error in result.errors() {
        let location = error
            .step_index
            .map_or_else(|| "workflow".to_string(), |i| format!("step {}", i));
        println!(
            "{} {} [{}]: {}",
            style("✗").red(),
            location,
            error.field,
            error.message
        );
        println!("    {}", style(format!("fix: {}", error.suggested_fix)).dim());
    }
}

fn print_warnings(result: &ValidationResult) {
    for warning in result.warnings() {
        let location = warning
            .step_index
            .map_or_else(|| "workflow".to_string(), |i| format!("step {}", i));
        println!(
            "{} {} [{}]: {}",
            style("⚠").yellow(),
            location,
            warning.field,
            warning.message
        );
    }
}

fn print_scores(result: &WorkflowResult, workflow: &WorkflowDefinition) -> Result<()> {
    let tolerance = workflow.resolved_tolerance()?;
    println!("Reliability:");
    for scorer in builtin_scorers() {
        println!(
            "  {:<12} {:.2}",
            scorer.name(),
            scorer.evaluate(result, &tolerance)
        );
    }
    Ok(())
}
