use clap::{Parser, Subcommand, ValueEnum};
use pn_components::{LinearBlend, NormalScatter, TransitionModel};
use pn_graph::Network;
use pn_solver::{FlowReport, InitialGuess, JacobianScheme, SolveOptions, find_flow_rates};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod reference;

use error::CliResult;

#[derive(Parser)]
#[command(name = "pn-cli")]
#[command(about = "PipeNet CLI - Steady flow in looped pipe networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the reference network and print flows, node checks and loop checks
    Solve(SolveArgs),
    /// Print the reference network's pipes, nodes and loops
    Describe,
}

#[derive(clap::Args)]
struct SolveArgs {
    /// Friction model for 2000 < Re < 4000
    #[arg(long, value_enum, default_value_t = Transition::Linear)]
    transition: Transition,
    /// Seed for the scatter transition model
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Relative standard deviation for the scatter transition model
    #[arg(long, default_value_t = 0.2)]
    spread: f64,
    /// Newton iteration cap
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Absolute tolerance on the residual norm
    #[arg(long)]
    tolerance: Option<f64>,
    /// Node whose balance equation is dropped (defaults to the first node)
    #[arg(long)]
    reference_node: Option<String>,
    /// Finite-difference scheme for the Jacobian
    #[arg(long, value_enum, default_value_t = Scheme::Forward)]
    jacobian: Scheme,
    /// Solve a second time starting from the first solution
    #[arg(long)]
    warm_restart: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transition {
    Linear,
    Scatter,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scheme {
    Forward,
    Central,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => cmd_solve(&args),
        Commands::Describe => cmd_describe(),
    }
}

fn transition_model(args: &SolveArgs) -> CliResult<Box<dyn TransitionModel>> {
    let model: Box<dyn TransitionModel> = match args.transition {
        Transition::Linear => Box::new(LinearBlend),
        Transition::Scatter => {
            Box::new(NormalScatter::seeded(args.seed).with_relative_spread(args.spread)?)
        }
    };
    Ok(model)
}

fn solve_options(args: &SolveArgs) -> SolveOptions {
    let mut options = SolveOptions {
        reference_node: args.reference_node.clone(),
        jacobian: match args.jacobian {
            Scheme::Forward => JacobianScheme::Forward,
            Scheme::Central => JacobianScheme::Central,
        },
        ..SolveOptions::default()
    };
    if let Some(max_iterations) = args.max_iterations {
        options.newton.max_iterations = max_iterations;
    }
    if let Some(tolerance) = args.tolerance {
        options.newton.abs_tol = tolerance;
    }
    options
}

fn cmd_solve(args: &SolveArgs) -> CliResult<()> {
    let mut network = reference::build(transition_model(args)?)?;
    info!(
        pipes = network.pipes().len(),
        nodes = network.nodes().len(),
        loops = network.loops().len(),
        transition = network.transition_model().name(),
        "solving reference network"
    );

    let mut options = solve_options(args);
    let mut solution = find_flow_rates(&mut network, &options)?;
    if args.warm_restart {
        options.initial_guess = InitialGuess::WarmStart;
        solution = find_flow_rates(&mut network, &options)?;
    }

    let report = FlowReport::new(&network, &solution)?;
    match args.format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn cmd_describe() -> CliResult<()> {
    let network = reference::build(Box::new(LinearBlend))?;
    print_network(&network);
    Ok(())
}

fn print_network(network: &Network) {
    let fluid = network.fluid();
    println!(
        "Fluid: mu = {} Pa·s, rho = {} kg/m³",
        fluid.mu(),
        fluid.rho()
    );

    println!("\nPipes:");
    for pipe in network.pipes() {
        println!(
            "  {:<4} L = {:>6.1} m  D = {:>5.1} mm  e = {} m",
            pipe.name(),
            pipe.length(),
            pipe.diameter() * 1000.0,
            pipe.roughness()
        );
    }

    println!("\nNodes:");
    for node in network.nodes() {
        let pipes: Vec<String> = network
            .pipes_incident_to(&node.name)
            .iter()
            .map(|p| p.name())
            .collect();
        println!(
            "  {}  external {:>6.2} L/s  pipes [{}]",
            node.name,
            node.external_flow(),
            pipes.join(", ")
        );
    }

    println!("\nLoops:");
    for lp in network.loops() {
        let pipes: Vec<String> = lp
            .pipes()
            .iter()
            .filter_map(|&id| network.pipe(id).map(|p| p.name()))
            .collect();
        println!("  {}  [{}]", lp.name, pipes.join(", "));
    }
}
