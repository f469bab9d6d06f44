pub mod motion;
pub mod synth;
