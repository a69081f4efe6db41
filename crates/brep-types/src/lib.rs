pub mod healing;
pub mod ops;
pub mod params;
pub mod topo;

pub use healing::*;
pub use ops::*;
pub use params::*;
pub use topo::*;
