use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use studyplan_core::scheduler::PLAN_DATE_FORMAT;
use studyplan_core::{CapacityCalculator, Config, EngineKind, PlanRequest, RequestFile, StudyPlan};
use tracing::debug;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate a study plan from a request file
    Generate {
        /// Request file (.toml or .json)
        #[arg(long, short)]
        input: PathBuf,
        /// First day of the plan (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Planning engine (advanced or urgency), defaults to config
        #[arg(long)]
        engine: Option<EngineKind>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Plan even if the request fails validation
        #[arg(long)]
        skip_validation: bool,
    },
    /// Show free study hours for each weekday
    Capacity {
        /// Request file (.toml or .json)
        #[arg(long, short)]
        input: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate {
            input,
            today,
            engine,
            json,
            skip_validation,
        } => {
            let (request, config) = load_request(&input, engine.is_none())?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            if !skip_validation {
                request.validate(today)?;
            }

            let engine = engine.unwrap_or(config.planner.engine).engine();
            debug!(engine = engine.name(), %today, input = %input.display(), "generating plan");
            let plan = engine.generate(&request, today);

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }
        PlanAction::Capacity { input, json } => {
            let (request, _) = load_request(&input, false)?;
            let week = CapacityCalculator::new(
                &request.calendar,
                &request.commitments,
                &request.preferences,
            )
            .weekly();

            if json {
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                for day in &week {
                    println!(
                        "{:<4} {:>5.2} h  (sleep {:.1}, calendar {:.0}, commitments {:.1}, breaks {:.1})",
                        day.weekday.to_string(),
                        day.available_hours,
                        day.sleep_hours,
                        day.calendar_hours,
                        day.commitment_hours,
                        day.break_hours,
                    );
                }
            }
        }
    }
    Ok(())
}

/// Read a request file, taking missing preferences and hours per day from
/// the user's config. The config is only read when something is missing
/// or `always_config` is set; an unreadable config is logged and replaced
/// by defaults.
fn load_request(
    path: &Path,
    always_config: bool,
) -> Result<(PlanRequest, Config), Box<dyn std::error::Error>> {
    let file = RequestFile::from_path(path)?;
    let needs_config =
        always_config || file.preferences.is_none() || file.study_hours_per_day.is_none();
    let config = if needs_config {
        Config::load_or_default()
    } else {
        Config::default()
    };
    let request = file.into_request(&config.preferences, config.planner.study_hours_per_day);
    Ok((request, config))
}

fn print_plan(plan: &StudyPlan) {
    if plan.is_empty() {
        println!("no study sessions planned");
        return;
    }

    for (date, sessions) in plan.days() {
        println!("{}", date.format(PLAN_DATE_FORMAT));
        for s in sessions {
            println!(
                "  {:<20} {:>14}  @{:02}:00  exam in {}d",
                s.subject, s.time_formatted, s.preferred_start_hour, s.days_until_exam
            );
        }
    }

    println!();
    println!("Summary");
    for s in plan.summary() {
        match (s.target_hours, s.percent) {
            (Some(target), Some(percent)) => println!(
                "  {:<20} {:>6.1}h / {:.1}h ({:.1}%)",
                s.subject, s.allocated_hours, target, percent
            ),
            _ => println!("  {:<20} {:>6.1}h", s.subject, s.allocated_hours),
        }
    }
}
