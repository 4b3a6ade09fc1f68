pub mod data;
pub mod edge;
pub mod history;
pub mod kind;
pub mod node;
pub mod store;

pub use data::*;
pub use edge::*;
pub use history::*;
pub use kind::*;
pub use node::*;
pub use store::*;
