pub mod ads;
pub mod category;
pub mod search;
pub mod settings;
pub mod story;
