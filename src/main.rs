use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};

use chartbounds::bounds::{find_bounds, Axis, BoundsQuery};
use chartbounds::consolidate::consolidate;
use chartbounds::csv_reader::{self, parse_column_selector, ColumnSelector, CsvData, IntervalColumns};
use chartbounds::dataset::{DomainOrder, KeyToGroupMap};
use chartbounds::locate::{interpolate_y, locate_bracket};
use chartbounds::stacked::{
    find_cumulative_range_bounds, find_grouped_stacked_range_bounds, find_stacked_range_bounds,
};
use chartbounds::Range;

#[derive(Parser, Debug)]
#[command(name = "chartbounds")]
#[command(about = "Compute axis bounds, stacked extents and lookups from CSV data", long_about = None)]
struct Cli {
    #[arg(
        long = "log-level",
        global = true,
        help = "Log filter such as 'debug' or 'chartbounds=trace' (defaults to RUST_LOG)"
    )]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bounds of the x values
    Domain {
        #[command(flatten)]
        series: SeriesColumns,
    },
    /// Bounds of the y values
    Range {
        #[command(flatten)]
        series: SeriesColumns,

        #[arg(long = "x-min", requires = "x_max", help = "Only count items with x at or above this")]
        x_min: Option<f64>,

        #[arg(long = "x-max", requires = "x_min", help = "Only count items with x at or below this")]
        x_max: Option<f64>,
    },
    /// Bounds of the value columns stacked per category
    Stacked {
        #[command(flatten)]
        table: TableColumns,

        #[arg(long = "base", default_value = "0", help = "Value the stacks grow from")]
        base: f64,

        #[arg(long = "group", help = "Stack a value column in its own group (column=group)")]
        groups: Vec<String>,
    },
    /// Bounds of running totals across categories
    Cumulative {
        #[command(flatten)]
        table: TableColumns,
    },
    /// Merge small entries into one
    Consolidate {
        #[arg(short = 'k', long = "key", required = true, help = "Key column (name or 0-based index)")]
        key_column: String,

        #[arg(short = 'v', long = "value", required = true, help = "Value column (name or 0-based index)")]
        value_column: String,

        #[arg(long = "threshold", required = true, help = "Minimum share of the total to stay separate")]
        threshold: f64,

        #[arg(long = "min-items", default_value = "2", help = "Merge only when this many entries are small")]
        min_items: usize,

        #[arg(long = "other", default_value = "Other", help = "Key of the merged entry")]
        other_key: String,
    },
    /// Interpolated y value at an x position
    Lookup {
        #[arg(short = 'x', long = "x", required = true, help = "X column (name or 0-based index)")]
        x_column: String,

        #[arg(short = 'y', long = "y", required = true, help = "Y column (name or 0-based index)")]
        y_column: String,

        #[arg(long = "at", required = true, allow_negative_numbers = true, help = "X position to look up")]
        at: f64,

        #[arg(long = "order", default_value = "none", help = "Domain order: ascending, descending or none")]
        order: DomainOrder,

        #[arg(long = "bracket", help = "Print the bracketing item indices instead of y")]
        bracket: bool,
    },
}

#[derive(Args, Debug)]
struct SeriesColumns {
    #[arg(short = 'x', long = "x", required = true, help = "X column (name or 0-based index)")]
    x_column: String,

    #[arg(short = 'y', long = "y", required = true, num_args = 1.., help = "Y columns, one series each")]
    y_columns: Vec<String>,

    #[arg(long = "start", requires = "end", help = "Interval start column")]
    start: Option<String>,

    #[arg(long = "end", requires = "start", help = "Interval end column")]
    end: Option<String>,

    #[arg(long = "exclude-interval", help = "Use plain values only")]
    exclude_interval: bool,

    #[arg(long = "visible", num_args = 1.., help = "Only count these series")]
    visible: Vec<String>,
}

#[derive(Args, Debug)]
struct TableColumns {
    #[arg(short = 'c', long = "category", required = true, help = "Category column (name or 0-based index)")]
    category_column: String,

    #[arg(long = "values", required = true, num_args = 1.., help = "Value columns, one row each")]
    value_columns: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = &cli.log_level {
        logger.parse_filters(level);
    }
    logger.init();

    let csv_data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;

    let output = run(&cli.command, &csv_data)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in output {
        writeln!(handle, "{}", line).context("Failed to write to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn run(command: &Command, csv_data: &CsvData) -> Result<Vec<String>> {
    match command {
        Command::Domain { series } => {
            let bounds = series_bounds(csv_data, series, Axis::Domain, None)?;
            Ok(vec![format_range(bounds)])
        }
        Command::Range { series, x_min, x_max } => {
            let filter = match (x_min, x_max) {
                (Some(lo), Some(hi)) => {
                    Some(Range::new(*lo, *hi).context("Invalid --x-min/--x-max filter")?)
                }
                _ => None,
            };
            let bounds = series_bounds(csv_data, series, Axis::Range, filter)?;
            Ok(vec![format_range(bounds)])
        }
        Command::Stacked {
            table,
            base,
            groups,
        } => {
            let dataset = table_dataset(csv_data, table)?;
            let bounds = if groups.is_empty() {
                find_stacked_range_bounds(&dataset, *base)
            } else {
                if *base != 0.0 {
                    log::warn!("--base is ignored when stacking in groups");
                }
                let map = group_map(groups)?;
                find_grouped_stacked_range_bounds(&dataset, &map)
                    .context("Failed to stack groups")?
            };
            Ok(vec![format_range(bounds)])
        }
        Command::Cumulative { table } => {
            let dataset = table_dataset(csv_data, table)?;
            Ok(vec![format_range(find_cumulative_range_bounds(&dataset))])
        }
        Command::Consolidate {
            key_column,
            value_column,
            threshold,
            min_items,
            other_key,
        } => {
            let dataset = csv_reader::slice_from_csv(
                csv_data,
                &parse_column_selector(key_column),
                &parse_column_selector(value_column),
            )
            .context("Failed to build slices")?;
            let result = consolidate(&dataset, other_key, *threshold, *min_items)
                .context("Failed to consolidate")?;
            Ok(result
                .entries()
                .iter()
                .map(|(key, value)| match value {
                    Some(v) => format!("{},{}", key, v),
                    None => format!("{},", key),
                })
                .collect())
        }
        Command::Lookup {
            x_column,
            y_column,
            at,
            order,
            bracket,
        } => {
            let mut dataset = csv_reader::series_from_csv(
                csv_data,
                &parse_column_selector(x_column),
                &[parse_column_selector(y_column)],
            )
            .context("Failed to build series")?;
            dataset.set_domain_order(Some(*order));

            if *bracket {
                let (lo, hi) = locate_bracket(&dataset, 0, *at)?.indices();
                return Ok(vec![format!("{},{}", lo, hi)]);
            }
            let y = interpolate_y(&dataset, 0, *at)?;
            Ok(vec![if y.is_nan() {
                "none".to_string()
            } else {
                y.to_string()
            }])
        }
    }
}

fn series_bounds(
    csv_data: &CsvData,
    columns: &SeriesColumns,
    axis: Axis,
    filter: Option<Range>,
) -> Result<Option<Range>> {
    let x = parse_column_selector(&columns.x_column);
    let ys: Vec<ColumnSelector> = columns
        .y_columns
        .iter()
        .map(|c| parse_column_selector(c))
        .collect();

    let mut query = BoundsQuery::new(axis).include_interval(!columns.exclude_interval);
    if !columns.visible.is_empty() {
        query = query.visible(&columns.visible);
    }
    if let Some(filter) = filter {
        query = query.within(filter);
    }

    let interval = match (&columns.start, &columns.end) {
        (Some(start), Some(end)) => Some(IntervalColumns {
            start: parse_column_selector(start),
            end: parse_column_selector(end),
        }),
        _ => None,
    };

    let bounds = match interval {
        Some(interval) => {
            let [y] = ys.as_slice() else {
                bail!("--start/--end need exactly one --y column");
            };
            let (x_interval, y_interval) = match axis {
                Axis::Domain => (Some(&interval), None),
                _ => (None, Some(&interval)),
            };
            let dataset =
                csv_reader::interval_series_from_csv(csv_data, &x, y, x_interval, y_interval)
                    .context("Failed to build interval series")?;
            find_bounds(&dataset, &query)?
        }
        None => {
            let dataset = csv_reader::series_from_csv(csv_data, &x, &ys)
                .context("Failed to build series")?;
            find_bounds(&dataset, &query)?
        }
    };
    Ok(bounds)
}

fn table_dataset(
    csv_data: &CsvData,
    columns: &TableColumns,
) -> Result<chartbounds::dataset::DefaultCategoryDataset> {
    let values: Vec<ColumnSelector> = columns
        .value_columns
        .iter()
        .map(|c| parse_column_selector(c))
        .collect();
    csv_reader::category_from_csv(
        csv_data,
        &parse_column_selector(&columns.category_column),
        &values,
    )
    .context("Failed to build category table")
}

fn group_map(assignments: &[String]) -> Result<KeyToGroupMap> {
    let mut map = KeyToGroupMap::default();
    for assignment in assignments {
        let (key, group) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Group '{}' must look like column=group", assignment))?;
        map.map_key_to_group(key.trim(), Some(group.trim()));
    }
    Ok(map)
}

fn format_range(range: Option<Range>) -> String {
    match range {
        Some(r) => r.to_string(),
        None => "none".to_string(),
    }
}
