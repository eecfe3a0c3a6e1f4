// One module per subcommand. Each handler loads its inputs, calls into
// evacroute-lib, and returns a serializable report.

pub mod hazards;
pub mod nearest;
pub mod rank;
