//! StableTable CLI entry point.

use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stabletable_foundation::{ColumnId, ColumnType};
use stabletable_runtime::{
    ImportOptions, ImportReport, Sidecar, TableFile, export_csv, export_json, import_csv,
    import_json, load_from_file, save_to_file,
};
use stabletable_sort::{SortDirection, SortKey, apply_sort, sort_rows};
use stabletable_storage::StableTable;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// A parsed command line.
enum Command {
    Help,
    Version,
    New { file: PathBuf, display_name: Option<String> },
    Info { file: PathBuf },
    AddColumn { file: PathBuf, name: String, column_type: ColumnType },
    AddRow { file: PathBuf, name: String },
    Export { file: PathBuf, out: Option<PathBuf>, json: bool },
    Import { file: PathBuf, input: PathBuf, json: bool, remove_missing: bool },
    Sort { file: PathBuf, keys: Vec<String>, apply: bool },
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> CliResult<Command> {
    let mut flags = Vec::new();
    let mut positional = Vec::new();
    let mut keys = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--key" => {
                i += 1;
                if i >= args.len() {
                    return Err("--key requires a value".into());
                }
                keys.push(args[i].clone());
            }
            flag @ ("--apply" | "--remove-missing") => flags.push(flag.to_string()),
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }

    let has_flag = |name: &str| flags.iter().any(|f| f == name);
    let mut positional = positional.into_iter();
    let Some(command) = positional.next() else {
        return Ok(Command::Help);
    };
    let mut next = |what: &str| {
        positional
            .next()
            .ok_or_else(|| format!("{command} requires <{what}>"))
    };

    let parsed = match command.as_str() {
        "new" => Command::New {
            file: next("file")?.into(),
            display_name: next("display-name").ok(),
        },
        "info" => Command::Info {
            file: next("file")?.into(),
        },
        "add-column" => Command::AddColumn {
            file: next("file")?.into(),
            name: next("name")?,
            column_type: next("type")?.parse()?,
        },
        "add-row" => Command::AddRow {
            file: next("file")?.into(),
            name: next("name")?,
        },
        "export-csv" | "export-json" => Command::Export {
            file: next("file")?.into(),
            out: next("out").ok().map(PathBuf::from),
            json: command == "export-json",
        },
        "import-csv" | "import-json" => Command::Import {
            file: next("file")?.into(),
            input: next("input")?.into(),
            json: command == "import-json",
            remove_missing: has_flag("--remove-missing"),
        },
        "sort" => Command::Sort {
            file: next("file")?.into(),
            keys,
            apply: has_flag("--apply"),
        },
        other => return Err(format!("unknown command: {other}").into()),
    };
    Ok(parsed)
}

fn run(args: Vec<String>) -> CliResult<()> {
    match parse_args(args)? {
        Command::Help => print_help(),
        Command::Version => println!("stabletable {}", env!("CARGO_PKG_VERSION")),
        Command::New { file, display_name } => {
            let display_name = display_name.unwrap_or_else(|| file_stem(&file));
            let table_file = TableFile::new(StableTable::new()).with_sidecar(Sidecar::new(display_name));
            save_to_file(&table_file, &file)?;
        }
        Command::Info { file } => print_info(&load_from_file(&file)?)?,
        Command::AddColumn { file, name, column_type } => {
            let mut table_file = load_from_file(&file)?;
            let id = table_file.table.add_column(column_type, name, None)?;
            save_to_file(&table_file, &file)?;
            println!("added column {id}");
        }
        Command::AddRow { file, name } => {
            let mut table_file = load_from_file(&file)?;
            let id = table_file.table.add_row(name, None)?;
            save_to_file(&table_file, &file)?;
            println!("added row {id}");
        }
        Command::Export { file, out, json } => {
            let table_file = load_from_file(&file)?;
            let writer: Box<dyn Write> = match out {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(io::stdout().lock()),
            };
            if json {
                export_json(&table_file.table, writer)?;
            } else {
                export_csv(&table_file.table, writer)?;
            }
        }
        Command::Import { file, input, json, remove_missing } => {
            let mut table_file = load_from_file(&file)?;
            let options = ImportOptions::default().with_remove_missing_rows(remove_missing);
            let source = input.display().to_string();
            let reader = BufReader::new(File::open(&input)?);
            let report = if json {
                import_json(&mut table_file.table, reader, &source, &options)?
            } else {
                import_csv(&mut table_file.table, reader, &source, &options)?
            };
            if let Some(sidecar) = table_file.sidecar.as_mut() {
                sidecar.source_path = Some(source);
            }
            save_to_file(&table_file, &file)?;
            print_report(&report);
        }
        Command::Sort { file, keys, apply } => {
            let mut table_file = load_from_file(&file)?;
            let keys = keys
                .iter()
                .map(|spec| parse_key(&table_file.table, spec))
                .collect::<CliResult<Vec<_>>>()?;
            if apply {
                apply_sort(&mut table_file.table, &keys)?;
                save_to_file(&table_file, &file)?;
            }
            for row in sort_rows(&table_file.table, &keys)? {
                println!("{:>6}  {}", row.identifier.raw(), row.name);
            }
        }
    }
    Ok(())
}

/// Parses `<column|@name>[:asc|:desc]`.
fn parse_key(table: &StableTable, spec: &str) -> CliResult<SortKey> {
    let (target, direction) = match spec.rsplit_once(':') {
        Some((target, "asc")) => (target, SortDirection::Ascending),
        Some((target, "desc")) => (target, SortDirection::Descending),
        _ => (spec, SortDirection::Ascending),
    };

    if target == "@name" {
        return Ok(SortKey::row_name(direction));
    }
    let column = match table.find_column_by_name(target) {
        Some(column) => column,
        None => target
            .parse::<u32>()
            .map(ColumnId::new)
            .map_err(|_| format!("no column named {target:?}"))?,
    };
    Ok(SortKey::column(column, table.column_type(column)?, direction))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_info(table_file: &TableFile) -> CliResult<()> {
    let table = &table_file.table;
    if let Some(sidecar) = &table_file.sidecar {
        println!("\x1b[1;36m=== {} ===\x1b[0m", sidecar.display_name);
        if let Some(source) = &sidecar.source_path {
            println!("Source: {source}");
        }
    }
    println!("Rows: {}", table.row_count());
    println!("Columns: {}", table.column_count());
    println!("Data version: {}", table.data_version());
    for column in table.column_descriptions()? {
        println!(
            "  [{}] {} : {}",
            column.identifier, column.name, column.column_type
        );
    }
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!("{report}");
    for warning in &report.warnings {
        println!("  \x1b[33mwarning:\x1b[0m {warning}");
    }
}

fn print_help() {
    println!(
        "\x1b[1mStableTable\x1b[0m - Columnar tables with stable row and column identifiers

\x1b[1mUSAGE:\x1b[0m
    stabletable <COMMAND> [ARGS...]

\x1b[1mCOMMANDS:\x1b[0m
    new <file> [display-name]              Create an empty table file
    info <file>                            Show rows, columns and version
    add-column <file> <name> <type>        Append a column of a kind
    add-row <file> <name>                  Append a row
    export-csv <file> [out]                Write CSV (stdout by default)
    export-json <file> [out]               Write JSON (stdout by default)
    import-csv <file> <csv>                Merge CSV rows into the table
    import-json <file> <json>              Merge JSON rows into the table
    sort <file> --key <spec>...            Print rows in sorted order

\x1b[1mOPTIONS:\x1b[0m
    -h, --help             Print help information
    -V, --version          Print version information
    --remove-missing       On import, remove rows the document omits
    --key <spec>           Sort key: <column|@name>[:asc|:desc]
    --apply                On sort, save the sorted order

\x1b[1mTYPES:\x1b[0m
    string char bool i8 u8 i16 u16 i32 u32 i64 u64 f32 f64
    vec2 vec3 vec4 vec2i vec3i quaternion rect recti color
    bounds boundsi hash128 enum object-ref

\x1b[1mEXAMPLES:\x1b[0m
    stabletable new items.table Items
    stabletable add-column items.table Priority i32
    stabletable import-csv items.table items.csv --remove-missing
    stabletable sort items.table --key Priority:desc --key @name --apply

Set RUST_LOG=debug to trace structural edits."
    );
}
