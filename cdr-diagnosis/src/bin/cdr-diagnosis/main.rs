mod model_file;

use std::error::Error;
use std::io::stdout;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use cdr_diagnosis::convert_case::Case;
use cdr_diagnosis::diagnosis::hs_tree::EnumerationStatus;
use cdr_diagnosis::diagnosis::hs_tree::FastDiagLabeler;
use cdr_diagnosis::diagnosis::hs_tree::HsTree;
use cdr_diagnosis::diagnosis::hs_tree::HsTreeOptions;
use cdr_diagnosis::diagnosis::hs_tree::HsTreeResult;
use cdr_diagnosis::diagnosis::hs_tree::QuickXPlainLabeler;
use cdr_diagnosis::diagnosis::FastDiag;
use cdr_diagnosis::diagnosis::FastDiagOptions;
use cdr_diagnosis::diagnosis::QuickXPlain;
use cdr_diagnosis::diagnosis::QuickXPlainOptions;
use cdr_diagnosis::engine::CheckerContext;
use cdr_diagnosis::model::DiagnosisModel;
use cdr_diagnosis::statistics::configure_statistic_logging;
use cdr_diagnosis::statistics::log_statistic;
use cdr_diagnosis::statistics::should_log_statistics;
use cdr_diagnosis::statistics::Statistic;
use cdr_diagnosis::statistics::StatisticLogger;
use cdr_diagnosis::statistics::StatisticOptions;
use cdr_diagnosis::termination::Combinator;
use cdr_diagnosis::termination::Deadline;
use cdr_diagnosis::termination::Interrupt;
use cdr_diagnosis::termination::NodeBudget;
use cdr_diagnosis::ConstraintSet;
use clap::Parser;
use clap::ValueEnum;
use log::debug;
use log::warn;
use log::LevelFilter;
use serde::Serialize;

use crate::model_file::LoadedModel;

#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize)]
enum Mode {
    /// Compute one minimal diagnosis with FastDiag.
    #[default]
    Diagnosis,
    /// Compute one minimal conflict with QuickXPlain.
    Conflict,
    /// Enumerate all minimal diagnoses with a hitting-set tree.
    AllDiagnoses,
    /// Enumerate all minimal conflicts with a hitting-set tree.
    AllConflicts,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize)]
enum LabelerKind {
    /// Label the nodes with diagnoses.
    #[default]
    FastDiag,
    /// Label the nodes with conflicts.
    #[value(name = "quick-xplain")]
    QuickXPlain,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize)]
enum StatisticCasing {
    #[default]
    Snake,
    Camel,
    Kebab,
}

impl From<StatisticCasing> for Case {
    fn from(casing: StatisticCasing) -> Case {
        match casing {
            StatisticCasing::Snake => Case::Snake,
            StatisticCasing::Camel => Case::Camel,
            StatisticCasing::Kebab => Case::Kebab,
        }
    }
}

#[derive(Debug, Parser, Serialize)]
#[command(arg_required_else_help = true)]
struct Args {
    /// The JSON file describing the variables and constraints.
    #[clap(verbatim_doc_comment)]
    model_path: PathBuf,

    #[arg(long = "mode", value_enum, default_value_t)]
    mode: Mode,

    /// The labels of the hitting-set tree; only used when enumerating.
    #[arg(long = "labeler", value_enum, default_value_t)]
    labeler: LabelerKind,

    /// Stop enumerating after this many results.
    #[arg(long = "max-results")]
    max_results: Option<usize>,

    #[arg(long = "max-depth")]
    max_depth: Option<usize>,

    /// Time limit of the enumeration in milliseconds.
    #[arg(long = "time-limit")]
    time_limit: Option<u64>,

    /// Stop enumerating after this many nodes have been labelled.
    #[arg(long = "max-nodes")]
    max_nodes: Option<u64>,

    /// Report the results found so far when a consistency check fails.
    #[arg(long = "best-effort")]
    best_effort: bool,

    /// Check the consistency of the background in every recursive call.
    #[arg(long = "disable-skip-shortcut")]
    disable_skip_shortcut: bool,

    /// Print the statistics of the request as `$stat$ name=value` lines.
    #[arg(long = "statistics")]
    statistics: bool,

    /// The casing of the statistic names.
    #[arg(long = "statistics-casing", value_enum, default_value_t)]
    statistics_casing: StatisticCasing,

    #[arg(long = "verbose")]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level_filter = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "{}", record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();

    debug!("Args: {}", serde_json::to_string(&args)?);

    if args.statistics {
        let _ = configure_statistic_logging(
            StatisticOptions::new("$stat$").with_casing(args.statistics_casing.into()),
        );
    }

    let LoadedModel { model, mut checker } = model_file::load(&args.model_path)?;

    let fastdiag = FastDiag::with_options(FastDiagOptions {
        skip_redundant_checks: !args.disable_skip_shortcut,
    });
    let quickxplain = QuickXPlain::with_options(QuickXPlainOptions {
        skip_redundant_checks: !args.disable_skip_shortcut,
    });

    let mut context = CheckerContext::new(&mut checker);
    let mut output = stdout();

    match args.mode {
        Mode::Diagnosis => {
            let diagnosis = fastdiag.find_diagnosis(
                model.possibly_faulty(),
                &model.all_constraints(),
                &mut context,
            )?;
            write_single(&mut output, &model, "Diagnosis", &diagnosis)?;
        }
        Mode::Conflict => {
            let conflict = quickxplain.find_conflict_set(
                model.possibly_faulty(),
                model.background(),
                &mut context,
            )?;
            write_single(&mut output, &model, "Conflict", &conflict)?;
        }
        Mode::AllDiagnoses | Mode::AllConflicts => {
            let enumerating_diagnoses = matches!(args.mode, Mode::AllDiagnoses);
            let options = HsTreeOptions {
                max_diagnoses: args.max_results.filter(|_| enumerating_diagnoses),
                max_conflicts: args.max_results.filter(|_| !enumerating_diagnoses),
                max_depth: args.max_depth,
                best_effort: args.best_effort,
            };
            let mut termination = Combinator::new(
                Interrupt::install()?,
                Combinator::new(
                    args.time_limit
                        .map(|time_limit| Deadline::after(Duration::from_millis(time_limit))),
                    args.max_nodes.map(NodeBudget::new),
                ),
            );

            let candidates = model.possibly_faulty();
            let background = model.background();
            let result = match args.labeler {
                LabelerKind::FastDiag => {
                    let mut tree = HsTree::with_options(FastDiagLabeler::new(fastdiag), options);
                    tree.construct(candidates, background, &mut context, &mut termination)?
                }
                LabelerKind::QuickXPlain => {
                    let mut tree =
                        HsTree::with_options(QuickXPlainLabeler::new(quickxplain), options);
                    tree.construct(candidates, background, &mut context, &mut termination)?
                }
            };

            write_enumeration(&mut output, &model, &result, enumerating_diagnoses)?;
            if should_log_statistics() {
                log_statistic("num_expanded_nodes", result.num_expanded_nodes);
                log_statistic("num_open_nodes", result.num_open_nodes);
            }
        }
    }

    if should_log_statistics() {
        context.statistics().log(StatisticLogger::default());
    }

    Ok(())
}

fn write_single(
    output: &mut impl Write,
    model: &DiagnosisModel,
    kind: &str,
    result: &ConstraintSet,
) -> std::io::Result<()> {
    if result.is_empty() {
        writeln!(output, "{kind}: none")
    } else {
        writeln!(
            output,
            "{kind}: {}",
            model.knowledge_base().describe(result)
        )
    }
}

fn write_enumeration(
    output: &mut impl Write,
    model: &DiagnosisModel,
    result: &HsTreeResult,
    diagnoses: bool,
) -> std::io::Result<()> {
    let (kind, sets) = if diagnoses {
        ("Diagnosis", &result.diagnoses)
    } else {
        ("Conflict", &result.conflicts)
    };

    for (index, set) in sets.iter().enumerate() {
        writeln!(
            output,
            "{kind} {}: {}",
            index + 1,
            model.knowledge_base().describe(set)
        )?;
    }

    match &result.status {
        EnumerationStatus::Complete => writeln!(output, "Found all {} results", sets.len()),
        EnumerationStatus::LimitReached => writeln!(output, "Stopped after {} results", sets.len()),
        EnumerationStatus::DepthLimited => {
            writeln!(output, "Found {} results up to the depth limit", sets.len())
        }
        EnumerationStatus::Terminated => {
            warn!("The enumeration was interrupted");
            writeln!(output, "Interrupted after {} results", sets.len())
        }
        EnumerationStatus::Failed(error) => {
            warn!("The enumeration failed: {error}");
            writeln!(output, "Failed after {} results", sets.len())
        }
    }
}
