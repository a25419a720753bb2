//! Clock/reset topology planning for the crg generator.
//!
//! A planning pass runs in a fixed order:
//!
//! 1. [`resolve_clock_source`] picks the board crystal or the on-chip oscillator.
//! 2. [`ResetController`] builds the one reset condition every PLL shares.
//! 3. [`PllPlanner`] allocates PLLs and derives the named clock domains.
//! 4. The finished [`DomainRegistry`] is frozen; downstream code only reads it.
//! 5. [`BoardClockEmitter`] forwards the SDRAM reference domain to its pin.
//!
//! [`build_topology`] runs the whole sequence and returns a [`ClockTopology`].
//!
//! ```
//! use crg_board::load_board;
//! use crg_config::CrgFlags;
//! use crg_plan::{build_topology, domain};
//! use crg_pll::Ecp5Pll;
//!
//! let board = load_board("i5", "7.0").unwrap();
//! let topo = build_topology(&CrgFlags::default(), board.as_ref(), &Ecp5Pll::new()).unwrap();
//! let sys = topo.registry.lookup(domain::SYSTEM).unwrap();
//! assert_eq!(sys.frequency.mhz(), 60.0);
//! assert!(topo.registry.lookup(domain::SYSTEM_DOUBLE_RATE).is_err());
//! ```

#![warn(missing_docs)]

pub mod domain;
pub mod emitter;
pub mod error;
pub mod ids;
pub mod planner;
pub mod pll;
pub mod registry;
pub mod report;
pub mod reset;
pub mod source;
pub mod topology;

pub use domain::{sdram_reference_domain, ClockDomain};
pub use emitter::{BoardClockEmitter, DdrOutput};
pub use error::PlanError;
pub use ids::PllId;
pub use planner::{ClockPlan, PllPlanner, SDRAM_CLOCK_PHASE};
pub use pll::{PllInstance, PllRole};
pub use registry::{DomainRegistry, LookupError};
pub use report::TopologyReport;
pub use reset::{ResetCondition, ResetController, ResetInputs};
pub use source::{resolve_clock_source, ClockSource, SourceKind};
pub use topology::{build_topology, BoardInfo, ClockTopology};
