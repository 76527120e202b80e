mod case;
mod context;
mod error;
mod units;

use clap::{Parser, Subcommand, ValueEnum};
use context::{Context, load_yaml, parse_component};
use error::CliResult;
use gp_eos::{
    EosModel, StateConditions, SweepDefinition, SweepQuantity, SweepType, filter_catalog,
    run_sweep,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

#[derive(Parser)]
#[command(name = "gp-cli")]
#[command(
    about = "Gas property estimator - equation-of-state calculations for gases and mixtures",
    long_about = None
)]
struct Cli {
    /// Engine configuration YAML (gas constant, solver settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Species table YAML replacing the built-in catalog
    #[arg(long, global = true)]
    species_table: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one state
    Evaluate {
        /// Equation of state (ideal-gas, van-der-waals, peng-robinson, peng-robinson-mixture)
        #[arg(short, long)]
        model: EosModel,
        /// Temperature, e.g. "300 K" or "25 C"
        #[arg(short, long)]
        temperature: String,
        /// Pressure, e.g. "5 MPa" or "14.7 psia"
        #[arg(short, long)]
        pressure: String,
        /// Component as NAME=FRACTION (repeatable)
        #[arg(short, long = "component", required = true)]
        components: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a YAML case file
    Case {
        /// Path to the case YAML file
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List or search the species catalog
    Species {
        /// Substring of an id, name or alias
        query: Option<String>,
    },
    /// Evaluate across a temperature or pressure range
    Sweep {
        #[arg(short, long)]
        model: EosModel,
        #[arg(short, long = "component", required = true)]
        components: Vec<String>,
        /// Swept quantity
        #[arg(long, value_enum)]
        quantity: QuantityArg,
        /// Range start (unit-tagged)
        #[arg(long)]
        start: String,
        /// Range end (unit-tagged)
        #[arg(long)]
        end: String,
        /// Number of points
        #[arg(long, default_value_t = 11)]
        points: usize,
        /// Logarithmic spacing
        #[arg(long)]
        log: bool,
        /// The other state variable, held fixed (pressure for a temperature sweep)
        #[arg(long)]
        fixed: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum QuantityArg {
    Temperature,
    Pressure,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let ctx = Context::load(cli.config.as_deref(), cli.species_table.as_deref())?;
    match cli.command {
        Commands::Evaluate {
            model,
            temperature,
            pressure,
            components,
            json,
        } => cmd_evaluate(&ctx, model, &temperature, &pressure, &components, json),
        Commands::Case { path, json } => cmd_case(&ctx, &path, json),
        Commands::Species { query } => {
            cmd_species(&ctx, query.as_deref().unwrap_or(""));
            Ok(())
        }
        Commands::Sweep {
            model,
            components,
            quantity,
            start,
            end,
            points,
            log,
            fixed,
            json,
        } => {
            let sweep = SweepArgs {
                quantity,
                start,
                end,
                points,
                log,
                fixed,
            };
            cmd_sweep(&ctx, model, &components, &sweep, json)
        }
    }
}

fn composition_from_args(ctx: &Context, args: &[String]) -> CliResult<gp_eos::Composition> {
    let parsed = args
        .iter()
        .map(|arg| parse_component(arg))
        .collect::<CliResult<Vec<_>>>()?;
    ctx.composition(parsed.iter().map(|(name, y)| (name.as_str(), *y)))
}

fn cmd_evaluate(
    ctx: &Context,
    model: EosModel,
    temperature: &str,
    pressure: &str,
    components: &[String],
    json: bool,
) -> CliResult<()> {
    let comp = composition_from_args(ctx, components)?;
    let t = units::parse_temperature(temperature)?;
    let p = units::parse_pressure(pressure)?;
    let evaluation = model.solve(&comp, StateConditions::from_si(t, p)?, &ctx.config)?;
    let conditions = evaluation.conditions();

    if json {
        let row = case::CaseRow {
            model,
            temperature_k: conditions.temperature_k(),
            pressure_pa: conditions.pressure_pa(),
            properties: Some(evaluation.properties()),
            error: None,
            error_kind: None,
        };
        println!("{}", serde_json::to_string_pretty(&row)?);
        return Ok(());
    }

    println!(
        "{model} at {} K, {} Pa",
        conditions.temperature_k(),
        conditions.pressure_pa()
    );
    for (species, y) in comp.iter() {
        println!("  {:<12} y = {y:.6}", species.name());
    }
    println!("  {}", evaluation.properties().summary());
    if let Some(root) = evaluation.root() {
        println!(
            "  root: {} iteration(s), {} attempt(s), residual {:.3e} Pa",
            root.iterations, root.attempts, root.residual
        );
    }
    Ok(())
}

fn cmd_case(ctx: &Context, path: &Path, json: bool) -> CliResult<()> {
    let case_file: case::CaseFile = load_yaml(path)?;
    let report = case::run_case(ctx, &case_file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(name) = &report.name {
        println!("Case: {name}");
    }
    for row in &report.rows {
        match (&row.properties, &row.error) {
            (Some(props), _) => println!(
                "  {:<26} T={:>9.3} K  P={:>12.1} Pa  {}",
                row.model.to_string(),
                row.temperature_k,
                row.pressure_pa,
                props.summary()
            ),
            (None, Some(err)) => println!(
                "  {:<26} T={:>9.3} K  P={:>12.1} Pa  ✗ [{}] {err}",
                row.model.to_string(),
                row.temperature_k,
                row.pressure_pa,
                row.error_kind.unwrap_or("error")
            ),
            (None, None) => {}
        }
    }
    Ok(())
}

fn cmd_species(ctx: &Context, query: &str) {
    if let Some(table) = &ctx.table {
        println!("{:<16} {:>10} {:>12} {:>12}", "name", "M [kg/mol]", "a", "b");
        for record in table.species.iter().filter(|r| r.matches_query(query)) {
            match record.to_species(ctx.config.gas_constant) {
                Ok(species) => println!(
                    "{:<16} {:>10.5} {:>12.5e} {:>12.5e}",
                    species.name(),
                    species.molar_mass(),
                    species.a(),
                    species.b()
                ),
                Err(err) => println!("{:<16} ✗ {err}", record.name),
            }
        }
        return;
    }

    let entries = filter_catalog(query);
    if entries.is_empty() {
        println!("No species match '{query}'");
        return;
    }
    println!(
        "{:<10} {:<26} {:>10} {:>9} {:>11} {:>7}",
        "id", "name", "M [kg/mol]", "Tc [K]", "Pc [Pa]", "ω"
    );
    for entry in entries {
        println!(
            "{:<10} {:<26} {:>10.5} {:>9.2} {:>11.4e} {:>7.3}",
            entry.canonical_id,
            entry.display_name,
            entry.molar_mass,
            entry.critical_temperature,
            entry.critical_pressure,
            entry.acentric_factor
        );
    }
}

struct SweepArgs {
    quantity: QuantityArg,
    start: String,
    end: String,
    points: usize,
    log: bool,
    fixed: String,
}

fn cmd_sweep(
    ctx: &Context,
    model: EosModel,
    components: &[String],
    args: &SweepArgs,
    json: bool,
) -> CliResult<()> {
    let comp = composition_from_args(ctx, components)?;
    let (quantity, start, end, fixed) = match args.quantity {
        QuantityArg::Temperature => (
            SweepQuantity::Temperature,
            units::parse_temperature(&args.start)?,
            units::parse_temperature(&args.end)?,
            units::parse_pressure(&args.fixed)?,
        ),
        QuantityArg::Pressure => (
            SweepQuantity::Pressure,
            units::parse_pressure(&args.start)?,
            units::parse_pressure(&args.end)?,
            units::parse_temperature(&args.fixed)?,
        ),
    };
    let sweep_type = if args.log {
        SweepType::Logarithmic
    } else {
        SweepType::Linear
    };
    let sweep = SweepDefinition::new(quantity, start, end, args.points, sweep_type)?;
    let result = run_sweep(model, &comp, &sweep, fixed, &ctx.config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{model}: {sweep}");
    for (value, props) in result.independent_values.iter().zip(&result.results) {
        match props {
            Some(props) => println!("  {value:>14.6e}  {}", props.summary()),
            None => println!("  {value:>14.6e}  ✗ failed"),
        }
    }
    println!(
        "{} succeeded, {} failed",
        result.num_successful, result.num_failed
    );
    let z = result.compressibility_factors();
    if let (Some(min), Some(max)) = (
        z.iter().copied().reduce(f64::min),
        z.iter().copied().reduce(f64::max),
    ) {
        println!("Z from {min:.6} to {max:.6}");
    }
    if let Some((index, err)) = &result.first_failure {
        warn!(index, error = %err, "first failed sweep point");
    }
    Ok(())
}
