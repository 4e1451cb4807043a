//! Tabulon CLI - query delimited-text files from the command line

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tabulon::prelude::*;
use tabulon::{Lines, SeekableLines};

#[derive(Parser)]
#[command(name = "tabq")]
#[command(author, version, about = "Filter, sort and slice delimited-text files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query a file: filter, sort, slice, then write CSV to stdout or a file
    Select {
        /// Input file (use '-' for stdin)
        input: PathBuf,

        /// Filter clause "<column> <operator> <value>", repeatable (ANDed).
        /// Operators: = != < <= > >= between "not between" in "not in"
        /// regexp "not regexp" contains "not contain" "starts with"
        /// "ends with". Pair/list values are comma-separated.
        #[arg(short = 'w', long = "where")]
        filters: Vec<String>,

        /// Ordering "<column>[:asc|:desc]", repeatable (ties broken in order)
        #[arg(short = 's', long = "order-by")]
        orderings: Vec<String>,

        /// Number of leading result rows to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Maximum number of result rows (-1 = unbounded)
        #[arg(short, long, default_value = "-1", allow_hyphen_values = true)]
        limit: i64,

        /// Fragment expression applied before filtering (e.g. "row=2-10",
        /// "col=1-3", "cell=1,1-4,4"); sub-tables are concatenated
        #[arg(short, long)]
        fragment: Option<String>,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Treat the first record as data instead of a header
        #[arg(long)]
        no_header: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about a delimited-text file
    Info {
        /// Input file (use '-' for stdin)
        input: PathBuf,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Treat the first record as data instead of a header
        #[arg(long)]
        no_header: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Select {
            input,
            filters,
            orderings,
            offset,
            limit,
            fragment,
            delimiter,
            no_header,
            output,
        } => select(
            &input,
            &filters,
            &orderings,
            offset,
            limit,
            fragment.as_deref(),
            delimiter,
            no_header,
            output.as_deref(),
        ),
        Commands::Info {
            input,
            delimiter,
            no_header,
        } => show_info(&input, delimiter, no_header),
    }
}

fn read_options(delimiter: char, no_header: bool) -> Result<ReadOptions> {
    if !delimiter.is_ascii() {
        return Err(anyhow!("Delimiter must be a single ASCII character"));
    }
    let controls = ControlSet::new(delimiter as u8, b'"', None)?;
    Ok(ReadOptions {
        controls,
        blank_lines: BlankLinePolicy::Skip,
        has_header: !no_header,
    })
}

fn open_reader(input: &Path, options: ReadOptions) -> Result<Reader<Box<dyn LineSource>>> {
    let source: Box<dyn LineSource> = if input.as_os_str() == "-" {
        Box::new(Lines::new(BufReader::new(io::stdin())))
    } else {
        let file = File::open(input)
            .with_context(|| format!("Failed to open '{}'", input.display()))?;
        Box::new(SeekableLines::new(BufReader::new(file)))
    };
    Ok(Reader::from_source(source, options))
}

#[allow(clippy::too_many_arguments)]
fn select(
    input: &Path,
    filters: &[String],
    orderings: &[String],
    offset: usize,
    limit: i64,
    fragment: Option<&str>,
    delimiter: char,
    no_header: bool,
    output: Option<&Path>,
) -> Result<()> {
    let options = read_options(delimiter, no_header)?;
    let reader = open_reader(input, options.clone())?;
    let mut records = reader
        .collect::<CsvResult<Vec<Record>>>()
        .context("Failed to read records")?;

    if let Some(expression) = fragment {
        let fragment = Fragment::from_expression(expression)?;
        records = fragment.find_all(&records).into_iter().flatten().collect();
    }

    let mut statement = Statement::new().offset(offset).limit(limit)?;
    for clause in filters {
        statement = statement.where_by(parse_filter(clause)?);
    }
    for ordering in orderings {
        statement = statement.order_by(parse_ordering(ordering)?);
    }

    let result = statement.process(records)?;
    eprintln!("{} record(s)", result.len());

    let write_options = WriteOptions {
        controls: options.controls,
        ..WriteOptions::default()
    };
    match output {
        Some(path) => {
            let mut writer = Writer::from_path(path, write_options)?;
            write_result(&mut writer, &result, no_header)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = Writer::new(stdout.lock(), write_options);
            write_result(&mut writer, &result, no_header)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_result<W: Write>(
    writer: &mut Writer<W>,
    result: &ResultSet,
    no_header: bool,
) -> Result<()> {
    if !no_header {
        if let Some(header) = result.first().and_then(|record| record.header()) {
            writer.write_record(&Record::from_iter(header.iter().cloned()))?;
        }
    }
    for record in result.iter() {
        writer.write_record(record)?;
    }
    Ok(())
}

fn show_info(input: &Path, delimiter: char, no_header: bool) -> Result<()> {
    let options = read_options(delimiter, no_header)?;
    let mut reader = open_reader(input, options)?;

    if let Some(header) = reader.headers()? {
        println!("Columns: {}", header.join(", "));
    }

    let mut count = 0usize;
    let mut min_arity = usize::MAX;
    let mut max_arity = 0usize;
    for record in reader.by_ref() {
        let record = record.context("Failed to read records")?;
        count += 1;
        min_arity = min_arity.min(record.len());
        max_arity = max_arity.max(record.len());
    }

    println!("Records: {count}");
    if count > 0 {
        if min_arity == max_arity {
            println!("Fields per record: {min_arity}");
        } else {
            println!("Fields per record: {min_arity}..{max_arity}");
        }
    }
    Ok(())
}

/// Parse "<column> <operator> <value>", trying the longest operator first
/// so that multi-word operators like "not between" resolve
fn parse_filter(clause: &str) -> Result<ColumnPredicate> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(anyhow!("Invalid filter clause: '{clause}'"));
    }
    let column = column_key(tokens[0]);

    for words in (1..=2.min(tokens.len() - 1)).rev() {
        let candidate = tokens[1..1 + words].join(" ");
        if let Ok(comparison) = Comparison::from_operator(&candidate) {
            let value = tokens[1 + words..].join(" ");
            let reference = shape_reference(comparison, &value)
                .with_context(|| format!("Invalid filter clause: '{clause}'"))?;
            return Ok(ColumnPredicate::new(column, comparison, reference)?);
        }
    }
    Err(anyhow!("Unknown operator in filter clause: '{clause}'"))
}

/// Build the reference operand in the shape the operator requires
fn shape_reference(comparison: Comparison, value: &str) -> Result<Operand> {
    Ok(match comparison {
        Comparison::Between | Comparison::NotBetween => {
            let (min, max) = value
                .split_once(',')
                .ok_or_else(|| anyhow!("'{}' requires 'min,max'", comparison))?;
            Operand::range(min.trim(), max.trim())
        }
        Comparison::In | Comparison::NotIn => {
            Operand::list(value.split(',').map(str::trim))
        }
        Comparison::Regexp | Comparison::NotRegexp => Operand::pattern(value),
        _ => Operand::value(value),
    })
}

/// Parse "<column>[:asc|:desc]"
fn parse_ordering(ordering: &str) -> Result<SortBy> {
    let (column, direction) = match ordering.rsplit_once(':') {
        Some((column, "asc")) => (column, Direction::Ascending),
        Some((column, "desc")) => (column, Direction::Descending),
        Some((_, other)) => {
            return Err(anyhow!("Unknown sort direction: '{other}'"));
        }
        None => (ordering, Direction::Ascending),
    };
    Ok(SortBy::new(column_key(column), direction))
}

/// Numeric column tokens are positional, everything else is a name
fn column_key(token: &str) -> ColumnKey {
    match token.parse::<isize>() {
        Ok(index) => ColumnKey::Index(index),
        Err(_) => ColumnKey::Name(token.to_string()),
    }
}
