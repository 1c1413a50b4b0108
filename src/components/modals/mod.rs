pub mod error;
pub mod helpers;
pub mod ref_picker;

pub use error::ErrorModal;
pub use ref_picker::RefPicker;
