pub mod pages;

pub use pages::{AssessPage, FieldView, ResultView};
