pub mod flash;
pub mod view_model;
