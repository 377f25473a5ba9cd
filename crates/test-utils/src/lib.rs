mod node_dist;
mod sandbox;

pub use node_dist::*;
pub use sandbox::*;
pub use starbase_sandbox::predicates;
