pub mod initializer;

pub use initializer::Initializer;
