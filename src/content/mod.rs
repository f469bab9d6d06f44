pub mod catalog;
pub mod category;
pub mod scorer;
pub mod script;
pub mod selector;
