pub mod form;
pub mod lifecycle;
pub mod model;
