//! FILENAME: app/src/main.rs
// PURPOSE: Command line driver for the pivot engine.

use std::path::PathBuf;
use std::process::ExitCode;

use app_lib::pivot::operations::format_view_table;
use app_lib::{pivot, AppConfig, AppState};
use clap::Parser;
use pivot_engine::PivotView;

#[derive(Parser, Debug)]
#[command(name = "pivot-demo")]
#[command(about = "Compute a pivot table over a JSON dataset and print it", long_about = None)]
struct Args {
    /// Field to group rows by (repeatable, in order)
    #[arg(long = "group", value_name = "FIELD")]
    group: Vec<String>,

    /// Field to nest columns by (repeatable, outer to inner)
    #[arg(long = "sub-group", value_name = "FIELD")]
    sub_group: Vec<String>,

    /// Numeric field to aggregate (repeatable)
    #[arg(long = "value", value_name = "FIELD")]
    value: Vec<String>,

    /// Aggregation: sum, avg, count, min or max
    #[arg(long, default_value = "sum")]
    op: String,

    /// JSON dataset to load instead of the bundled one
    #[arg(long, value_name = "PATH")]
    dataset: Option<PathBuf>,

    /// Seed for synthesized carats/pcs values
    #[arg(long)]
    seed: Option<u64>,

    /// Print a formatted text table instead of JSON
    #[arg(long)]
    table: bool,

    /// Print the field palette and exit
    #[arg(long)]
    fields: bool,
}

fn main() -> ExitCode {
    app_lib::logging::init_stderr_logger("warn");
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let mut config = AppConfig::from_env().map_err(|e| e.to_string())?;
    if args.dataset.is_some() {
        config.dataset_path = args.dataset.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let state = app_lib::load_app_state(config)?;

    if args.fields {
        let fields = pivot::get_field_list(&state)?;
        return print_json(&fields);
    }

    apply_args(&state, &args)?;
    let response = pivot::recompute(&state)?;

    if response.is_stale {
        return Err("at least one --group and one --value field are required".to_string());
    }

    if args.table {
        let view = PivotView {
            version: response.version,
            operator: response.operator,
            columns: response.columns,
            rows: response.rows,
        };
        print_table(&format_view_table(&view));
        Ok(())
    } else {
        print_json(&response)
    }
}

fn apply_args(state: &AppState, args: &Args) -> Result<(), String> {
    let zones = [
        ("group_by", &args.group),
        ("sub_group_by", &args.sub_group),
        ("values", &args.value),
    ];
    for (zone, fields) in zones {
        for field in fields {
            pivot::drop_field(state, zone, field)?;
        }
    }
    pivot::set_aggregation(state, &args.op)?;
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn print_table(lines: &[Vec<String>]) {
    let columns = lines.first().map(Vec::len).unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            lines
                .iter()
                .filter_map(|line| line.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for line in lines {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:>width$}", cell, width = width))
            .collect();
        println!("{}", cells.join("  "));
    }
}
