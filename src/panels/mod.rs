mod central_panel;
mod image_picker;
mod properties_panel;
mod tools_panel;

pub use central_panel::central_panel;
pub use image_picker::{ImagePicker, PickerPurpose, image_picker};
pub use properties_panel::{PanelDraft, properties_panel};
pub use tools_panel::tools_panel;
