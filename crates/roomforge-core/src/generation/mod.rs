//! Generation - the passes that build a level, in pipeline order:
//! bounds, room shell, platforms, decorations.

mod bounds;
mod decoration;
mod layout;
mod platforms;
mod room;

pub use bounds::*;
pub use decoration::*;
pub use layout::*;
pub use platforms::*;
pub use room::*;
