//! crg CLI: plans and emits the clock/reset generator for a Colorlight board.
//!
//! `crg plan` prints the planned topology; `crg emit` writes the Verilog
//! module and its LPF/SDC constraints.

#![warn(missing_docs)]

mod emit;
mod logging;
mod pipeline;
mod plan;

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// crg: clock/reset generator for ECP5 SoCs.
#[derive(Parser, Debug)]
#[command(name = "crg", version, about = "Clock/reset generator for ECP5 SoCs")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `crg.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan the clock topology and print it.
    Plan(PlanArgs),
    /// Plan the clock topology and write crg.v, crg.lpf and crg.sdc.
    Emit(EmitArgs),
}

/// Arguments for the `crg plan` subcommand.
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Configuration overrides.
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the `crg emit` subcommand.
#[derive(Parser, Debug)]
pub struct EmitArgs {
    /// Directory to write the generated files into.
    #[arg(short, long, default_value = "build/crg")]
    pub output_dir: String,

    /// Configuration overrides.
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Command-line overrides applied on top of `crg.toml`.
#[derive(Args, Debug, Default, Clone)]
pub struct OverrideArgs {
    /// Board name (`i5` or `i9`).
    #[arg(long)]
    pub board: Option<String>,

    /// Board revision.
    #[arg(long)]
    pub revision: Option<String>,

    /// System clock frequency (e.g., `60MHz`).
    #[arg(long)]
    pub sys_clk_freq: Option<String>,

    /// SDRAM rate (`1:1` or `1:2`).
    #[arg(long)]
    pub sdram_rate: Option<String>,

    /// Clock from the on-chip oscillator.
    #[arg(long)]
    pub internal_osc: bool,

    /// On-chip oscillator divider.
    #[arg(long)]
    pub osc_divider: Option<u32>,

    /// UART name; `usb_acm` enables the USB PLL.
    #[arg(long)]
    pub uart_name: Option<String>,

    /// Enable the video terminal (and the video PLL).
    #[arg(long)]
    pub video_terminal: bool,

    /// Enable the video framebuffer (and the video PLL).
    #[arg(long)]
    pub video_framebuffer: bool,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    logging::init(&global);

    let result = match cli.command {
        Command::Plan(ref args) => plan::run(args, &global),
        Command::Emit(ref args) => emit::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
