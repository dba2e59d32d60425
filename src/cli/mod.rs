//! CP-010: CLI subcommands — init, validate, items, jobs, plan, export, import.

use crate::core::{format, parser, planner, store, types};
use crate::provenance::{eventlog, hasher};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter workbook
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate a workbook
    Validate {
        /// Path to the workbook (.yaml or .json)
        #[arg(short, long, default_value = store::WORKBOOK_FILE)]
        file: PathBuf,
    },

    /// List a pack's items with their tiers
    Items {
        /// Path to the workbook (.yaml or .json)
        #[arg(short, long, default_value = store::WORKBOOK_FILE)]
        file: PathBuf,

        /// Pack id (default: first pack)
        #[arg(short, long)]
        pack: Option<String>,
    },

    /// List a pack's saved jobs
    Jobs {
        /// Path to the workbook (.yaml or .json)
        #[arg(short, long, default_value = store::WORKBOOK_FILE)]
        file: PathBuf,

        /// Pack id (default: first pack)
        #[arg(short, long)]
        pack: Option<String>,
    },

    /// Expand a job into base-material totals and a breakdown
    Plan {
        /// Path to the workbook (.yaml or .json)
        #[arg(short, long, default_value = store::WORKBOOK_FILE)]
        file: PathBuf,

        /// Pack id (default: first pack)
        #[arg(short, long)]
        pack: Option<String>,

        /// Saved job to plan
        #[arg(short, long, conflicts_with = "line", required_unless_present = "line")]
        job: Option<String>,

        /// Ad-hoc line, ITEM or ITEM=QTY (repeatable)
        #[arg(short, long)]
        line: Vec<String>,

        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,

        /// Append a provenance event to this JSONL log
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Write the workbook as a JSON bulk document
    Export {
        /// Path to the workbook (.yaml or .json)
        #[arg(short, long, default_value = store::WORKBOOK_FILE)]
        file: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,

        /// Append a provenance event to this JSONL log
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Convert a JSON bulk document into a YAML workbook
    Import {
        /// JSON document with packs, items and jobs
        input: PathBuf,

        /// Output workbook path
        #[arg(short, long, default_value = store::WORKBOOK_FILE)]
        output: PathBuf,

        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,
    },
}

/// Options for a plan run.
pub struct PlanRequest<'a> {
    pub file: &'a Path,
    pub pack: Option<&'a str>,
    pub job: Option<&'a str>,
    pub lines: &'a [String],
    pub json: bool,
    pub log: Option<&'a Path>,
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Items { file, pack } => cmd_items(&file, pack.as_deref()),
        Commands::Jobs { file, pack } => cmd_jobs(&file, pack.as_deref()),
        Commands::Plan {
            file,
            pack,
            job,
            line,
            json,
            log,
        } => {
            let req = PlanRequest {
                file: &file,
                pack: pack.as_deref(),
                job: job.as_deref(),
                lines: &line,
                json,
                log: log.as_deref(),
            };
            let output = cmd_plan(&req)?;
            print!("{}", output);
            Ok(())
        }
        Commands::Export { file, output, log } => cmd_export(&file, &output, log.as_deref()),
        Commands::Import {
            input,
            output,
            force,
        } => cmd_import(&input, &output, force),
    }
}

fn cmd_init(path: &Path) -> Result<(), String> {
    let workbook_path = path.join(store::WORKBOOK_FILE);
    if workbook_path.exists() {
        return Err(format!("{} already exists", workbook_path.display()));
    }

    store::save_workbook(&workbook_path, &store::sample_workbook())?;

    println!("Initialized craftplan workbook at {}", path.display());
    println!("  Created: {}", workbook_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let workbook = parser::parse_workbook_file(file)?;
    let problems = parser::validate_workbook(&workbook);
    let errors = parser::errors_only(&problems);

    for p in &problems {
        eprintln!("  {}", p);
    }
    if !errors.is_empty() {
        return Err(format!("{} validation error(s)", errors.len()));
    }

    println!(
        "OK: {} ({} packs, {} items, {} jobs)",
        workbook.name.as_deref().unwrap_or("workbook"),
        workbook.packs.len(),
        workbook.items.len(),
        workbook.jobs.len()
    );
    Ok(())
}

/// Parse and validate a workbook, failing only on errors. Warnings go to
/// stderr.
fn parse_and_validate(file: &Path) -> Result<types::Workbook, String> {
    let workbook = parser::parse_workbook_file(file)?;
    let problems = parser::validate_workbook(&workbook);
    for p in &problems {
        eprintln!("  {}", p);
    }
    if parser::errors_only(&problems).is_empty() {
        Ok(workbook)
    } else {
        Err("validation failed".to_string())
    }
}

fn cmd_items(file: &Path, pack: Option<&str>) -> Result<(), String> {
    let workbook = parse_and_validate(file)?;
    let pack = workbook.select_pack(pack)?;
    let catalogue = types::Catalogue::for_pack(&workbook, &pack.id);

    println!("{} ({} items)", pack.name, catalogue.len());
    print!("{}", format::format_item_list(&catalogue));
    Ok(())
}

fn cmd_jobs(file: &Path, pack: Option<&str>) -> Result<(), String> {
    let workbook = parse_and_validate(file)?;
    let pack = workbook.select_pack(pack)?;

    let mut jobs: Vec<&types::Job> = workbook.jobs_in_pack(&pack.id).collect();
    jobs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    println!("{} ({} jobs)", pack.name, jobs.len());
    for job in jobs {
        println!("  {} [{}] — {} line(s)", job.name, job.id, job.lines.len());
    }
    Ok(())
}

/// Plan a saved job or ad-hoc lines and render the result.
pub fn cmd_plan(req: &PlanRequest<'_>) -> Result<String, String> {
    let workbook = parse_and_validate(req.file)?;
    let pack = workbook.select_pack(req.pack)?;
    let catalogue = types::Catalogue::for_pack(&workbook, &pack.id);

    let requested = match req.job {
        Some(job_id) => workbook
            .job(&pack.id, job_id)
            .ok_or_else(|| format!("unknown job '{}' in pack '{}'", job_id, pack.id))?
            .lines
            .clone(),
        None => req
            .lines
            .iter()
            .map(|s| planner::parse_line_spec(s))
            .collect::<Result<Vec<_>, _>>()?,
    };
    let lines = planner::plannable_lines(&requested);
    if lines.is_empty() {
        return Err("add at least one line to plan totals".to_string());
    }

    let plan = planner::plan_job(&lines, &catalogue);

    if let Some(log) = req.log {
        let event = types::PlanEvent::PlanComputed {
            run_id: eventlog::generate_run_id(),
            pack: pack.id.clone(),
            job: req.job.map(str::to_string),
            lines: lines.len(),
            base_materials: plan.totals.len(),
            workbook_hash: hasher::hash_file(req.file)?,
            totals_hash: hasher::hash_totals(&plan.totals),
        };
        eventlog::append_event(log, event)?;
    }

    if req.json {
        let mut out = serde_json::to_string_pretty(&plan)
            .map_err(|e| format!("JSON serialize error: {}", e))?;
        out.push('\n');
        return Ok(out);
    }

    let title = match req.job.and_then(|id| workbook.job(&pack.id, id)) {
        Some(job) => format!("Plan: {} ({})\n\n", job.name, pack.name),
        None => format!("Plan: ad-hoc ({})\n\n", pack.name),
    };
    Ok(title + &format::format_plan(&plan, &catalogue))
}

fn cmd_export(file: &Path, output: &Path, log: Option<&Path>) -> Result<(), String> {
    let workbook = parse_and_validate(file)?;
    let json_path = if parser::Format::from_path(output) == parser::Format::Json {
        output.to_path_buf()
    } else {
        output.with_extension("json")
    };
    store::save_workbook(&json_path, &workbook)?;

    if let Some(log) = log {
        let event = types::PlanEvent::WorkbookExported {
            path: json_path.display().to_string(),
            workbook_hash: hasher::hash_file(&json_path)?,
        };
        eventlog::append_event(log, event)?;
    }

    println!(
        "Exported {} packs, {} items, {} jobs to {}",
        workbook.packs.len(),
        workbook.items.len(),
        workbook.jobs.len(),
        json_path.display()
    );
    Ok(())
}

fn cmd_import(input: &Path, output: &Path, force: bool) -> Result<(), String> {
    if output.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        ));
    }

    let content = std::fs::read_to_string(input)
        .map_err(|e| format!("failed to read {}: {}", input.display(), e))?;
    let workbook = parser::parse_workbook(&content, parser::Format::Json)?;
    let problems = parser::validate_workbook(&workbook);
    for p in &problems {
        eprintln!("  {}", p);
    }
    let errors = parser::errors_only(&problems);
    if !errors.is_empty() {
        return Err(format!("{} validation error(s) in import", errors.len()));
    }

    store::save_workbook(output, &workbook)?;
    println!(
        "Imported {} packs, {} items, {} jobs into {}",
        workbook.packs.len(),
        workbook.items.len(),
        workbook.jobs.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_workbook() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path()).unwrap();
        let file = dir.path().join(store::WORKBOOK_FILE);
        (dir, file)
    }

    fn request<'a>(file: &'a Path, lines: &'a [String]) -> PlanRequest<'a> {
        PlanRequest {
            file,
            pack: Some("minecraft"),
            job: None,
            lines,
            json: false,
            log: None,
        }
    }

    #[test]
    fn test_cp010_init_creates_valid_workbook() {
        let (_dir, file) = init_workbook();
        assert!(file.exists());
        cmd_validate(&file).unwrap();
    }

    #[test]
    fn test_cp010_init_refuses_overwrite() {
        let (dir, _file) = init_workbook();
        let err = cmd_init(dir.path()).unwrap_err();
        assert!(err.contains("already exists"));
    }

    #[test]
    fn test_cp010_validate_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.yaml");
        std::fs::write(
            &file,
            "version: \"2.0\"\npacks: []\nitems: []\njobs: []\n",
        )
        .unwrap();
        let err = cmd_validate(&file).unwrap_err();
        assert!(err.contains("1 validation error"));
    }

    #[test]
    fn test_cp010_plan_saved_job() {
        let (_dir, file) = init_workbook();
        let mut req = request(&file, &[]);
        req.job = Some("mining-kit");
        let out = cmd_plan(&req).unwrap();
        assert!(out.starts_with("Plan: Mining Kit (Minecraft)\n"));
        assert!(out.contains("Totals:\nCobblestone x 6\nOak Log x 1.5\n"));
        assert!(out.contains("Breakdown:\n- Stone Pickaxe x 2\n  - Cobblestone x 6\n  - Stick x 4\n"));
    }

    #[test]
    fn test_cp010_plan_default_pack_is_first() {
        let (_dir, file) = init_workbook();
        let mut req = request(&file, &[]);
        req.pack = None;
        req.job = Some("capacitors");
        let out = cmd_plan(&req).unwrap();
        assert!(out.contains("Tritanium x 1200"));
        assert!(out.contains("Pyerite x 400"));
    }

    #[test]
    fn test_cp010_plan_adhoc_lines() {
        let (_dir, file) = init_workbook();
        let lines = vec!["plank=8".to_string(), "log".to_string()];
        let out = cmd_plan(&request(&file, &lines)).unwrap();
        assert!(out.starts_with("Plan: ad-hoc (Minecraft)"));
        assert!(out.contains("Oak Log x 3\n"));
    }

    #[test]
    fn test_cp010_plan_drops_unplannable_lines() {
        let (_dir, file) = init_workbook();
        let lines = vec!["log=0".to_string(), "log=-1".to_string()];
        let err = cmd_plan(&request(&file, &lines)).unwrap_err();
        assert!(err.contains("add at least one line"));
    }

    #[test]
    fn test_cp010_plan_unknown_item_reports_nothing() {
        let (_dir, file) = init_workbook();
        let lines = vec!["diamond=3".to_string()];
        let out = cmd_plan(&request(&file, &lines)).unwrap();
        assert!(out.ends_with("No totals to display.\n"));
    }

    #[test]
    fn test_cp010_plan_unknown_job() {
        let (_dir, file) = init_workbook();
        let mut req = request(&file, &[]);
        req.job = Some("nope");
        assert!(cmd_plan(&req).unwrap_err().contains("unknown job 'nope'"));
    }

    #[test]
    fn test_cp010_plan_json() {
        let (_dir, file) = init_workbook();
        let lines = vec!["stick=4".to_string()];
        let mut req = request(&file, &lines);
        req.json = true;
        let out = cmd_plan(&req).unwrap();
        let plan: types::JobPlan = serde_json::from_str(&out).unwrap();
        assert_eq!(plan.totals["log"], 0.5);
        assert_eq!(plan.trees[0].item_id, "stick");
    }

    #[test]
    fn test_cp010_plan_appends_log() {
        let (dir, file) = init_workbook();
        let log = dir.path().join("state/plans.jsonl");
        let lines = vec!["stone-pickaxe=1".to_string()];
        let mut req = request(&file, &lines);
        req.log = Some(log.as_path());
        cmd_plan(&req).unwrap();
        cmd_plan(&req).unwrap();

        let events = eventlog::read_events(&log).unwrap();
        assert_eq!(events.len(), 2);
        match (&events[0].event, &events[1].event) {
            (
                types::PlanEvent::PlanComputed {
                    totals_hash: a,
                    workbook_hash: wa,
                    base_materials,
                    ..
                },
                types::PlanEvent::PlanComputed {
                    totals_hash: b,
                    workbook_hash: wb,
                    ..
                },
            ) => {
                assert_eq!(a, b);
                assert_eq!(wa, wb);
                assert_eq!(*base_materials, 2);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_cp010_export_then_import() {
        let (dir, file) = init_workbook();
        let exported = dir.path().join("export.json");
        cmd_export(&file, &exported, None).unwrap();

        let imported = dir.path().join("imported.yaml");
        cmd_import(&exported, &imported, false).unwrap();
        let original = parser::parse_workbook_file(&file).unwrap();
        let roundtrip = parser::parse_workbook_file(&imported).unwrap();
        assert_eq!(original, roundtrip);

        let err = cmd_import(&exported, &imported, false).unwrap_err();
        assert!(err.contains("--force"));
        cmd_import(&exported, &imported, true).unwrap();
    }

    #[test]
    fn test_cp010_export_forces_json_extension() {
        let (dir, file) = init_workbook();
        cmd_export(&file, &dir.path().join("backup"), None).unwrap();
        assert!(dir.path().join("backup.json").exists());
    }

    #[test]
    fn test_cp010_import_rejects_partial_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("partial.json");
        std::fs::write(&input, r#"{"packs": [], "items": []}"#).unwrap();
        let err = cmd_import(&input, &dir.path().join("out.yaml"), false).unwrap_err();
        assert!(err.contains("invalid document"));
    }
}
