mod config;
mod milp;
mod model;
mod solver;

pub use config::{SolverConfig, overcrowd_weight, overlap_weight};
pub use milp::{LinearExpr, MilpModel, Sense, VarDomain, VarId};
pub use model::SchedulingModel;
