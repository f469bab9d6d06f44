pub mod compositor;
pub mod dsl;
pub mod model;
