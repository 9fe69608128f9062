use std::path::Path;
use std::process;
use std::thread::available_parallelism;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use csv::{ReaderBuilder, Trim};
use tracing::{error, info};

use multiprocessor_edf::constants::{EDFVersion, Heuristic, Sorting};
use multiprocessor_edf::scheduler::Scheduler;
use multiprocessor_edf::{Task, TaskSet, TimeStep, ID};

/// Exit code for unreadable input or invalid arguments.
const INPUT_ERROR: i32 = 5;

/// Reads a task set file and returns a `TaskSet`.
///
/// One task per row: offset, computation time, deadline, period. The row
/// number, starting at 1, becomes the task id.
pub fn read_task_file(file_path: &Path) -> Result<TaskSet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_path(file_path)
        .with_context(|| format!("cannot open {}", file_path.display()))?;
    let mut tasks = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let id = index as ID + 1;
        let record = result.with_context(|| format!("row {id}"))?;
        if record.len() != 4 {
            bail!("row {id}: expected 4 fields, found {}", record.len());
        }

        let field = |i: usize| -> Result<TimeStep> {
            record[i].parse::<TimeStep>().with_context(|| {
                format!("row {id}: '{}' is not a non-negative integer", &record[i])
            })
        };
        tasks.push(Task::new(id, field(0)?, field(1)?, field(2)?, field(3)?));
    }

    Ok(TaskSet::try_new(tasks)?)
}

pub fn build_cli_command() -> Command {
    Command::new("multiprocessor-edf")
        .version("0.1.0")
        .about("Decides whether a task set is schedulable with EDF on identical processors")
        .disable_version_flag(true)
        .disable_help_flag(true)
        .arg(Arg::new("help")
            .long("help")
            .action(ArgAction::Help)
            .help("Print help"))

        .arg(Arg::new("task_file")
            .required(true)
            .help("Path to the task set file"))

        .arg(Arg::new("m")
            .required(true)
            .value_parser(value_parser!(usize))
            .help("Number of cores"))

        .arg(Arg::new("version")
            .short('v')
            .long("version")
            .required(true)
            .value_parser(|s: &str| s.parse::<EDFVersion>().map_err(|e| e.to_string()))
            .help("Version of EDF to use (global, partitioned, or EDF(k))"))

        .arg(Arg::new("workers")
            .short('w')
            .long("workers")
            .value_parser(value_parser!(usize))
            .help("Number of workers to run the partitioned simulations"))

        .arg(Arg::new("heuristic")
            .short('h')
            .long("heuristic")
            .default_value("ff")
            .value_parser(|s: &str| s.parse::<Heuristic>().map_err(|e| e.to_string()))
            .help("Heuristic to use for partitioned scheduling (ff, nf, bf, wf)"))

        .arg(Arg::new("sorting")
            .short('s')
            .long("sorting")
            .default_value("du")
            .value_parser(|s: &str| s.parse::<Sorting>().map_err(|e| e.to_string()))
            .help("Task ordering based on utilization (iu, du)"))

        .arg(Arg::new("horizon")
            .long("horizon")
            .value_parser(value_parser!(TimeStep))
            .help("Simulate up to this time instead of the computed feasibility interval"))
}

fn build_scheduler(matches: &ArgMatches, task_set: TaskSet) -> Scheduler {
    let num_cores = *matches.get_one::<usize>("m").unwrap_or(&1);
    let workers = matches
        .get_one::<usize>("workers")
        .copied()
        .unwrap_or_else(|| available_parallelism().map_or(1, |n| n.get()));

    let mut scheduler = Scheduler::new(task_set, num_cores);
    if let Some(version) = matches.get_one::<EDFVersion>("version") {
        scheduler.set_version(*version);
    }
    if let Some(heuristic) = matches.get_one::<Heuristic>("heuristic") {
        scheduler.set_heuristic(*heuristic);
    }
    if let Some(sorting) = matches.get_one::<Sorting>("sorting") {
        scheduler.set_sorting(*sorting);
    }
    scheduler.set_threads(workers);
    scheduler.set_horizon(matches.get_one::<TimeStep>("horizon").copied());
    scheduler
}

fn main() {
    // cargo run <task_file> <m> -v global|partitioned|<k> [-w <w>] [-h ff|nf|bf|wf] [-s iu|du]
    // example : cargo run test.csv 4 -v partitioned -w 8 -h ff -s iu
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Usage errors exit with the input error code; --help exits successfully.
    let matches = match build_cli_command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(INPUT_ERROR);
        }
    };

    let Some(task_file) = matches.get_one::<String>("task_file") else {
        process::exit(INPUT_ERROR);
    };
    let task_set = match read_task_file(Path::new(task_file)) {
        Ok(task_set) => task_set,
        Err(e) => {
            error!("Error reading task file: {e:#}");
            process::exit(INPUT_ERROR);
        }
    };
    if *matches.get_one::<usize>("m").unwrap_or(&0) == 0 {
        error!("m must be at least 1");
        process::exit(INPUT_ERROR);
    }

    let scheduler = build_scheduler(&matches, task_set);
    info!(version = ?scheduler.version(), "testing task set");

    let schedulable = scheduler.test_task_set();
    println!("{:?}", schedulable);

    process::exit(schedulable as i32);
}
