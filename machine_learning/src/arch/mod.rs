pub mod activations;
mod builder;
pub mod layers;
pub mod loss;
mod model;
mod sequential;

pub use builder::build_model;
pub use model::Model;
pub use sequential::Sequential;
