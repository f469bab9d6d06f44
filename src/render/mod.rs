pub mod composite;
pub mod frame;
pub mod overlay;
pub mod pipeline;
