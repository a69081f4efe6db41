pub mod bind;
pub mod classify;
pub mod feature;
pub mod gate;
pub mod heal;
pub mod solid;
pub mod types;

pub use bind::{bind, bind_scalar, eligible_edges, EligibleEdge};
pub use classify::classify;
pub use feature::{execute_chamfer, execute_fillet, execute_sew, execute_shell};
pub use gate::validate;
pub use heal::execute_heal;
pub use solid::Solid;
pub use types::OpError;
