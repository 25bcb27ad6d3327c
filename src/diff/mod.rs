// Positional block diff.
//
// - `options` - block size, offset width, overlay selection
// - `mask`    - per-position difference flags for one block
// - `overlay` - text renderings appended to each line
// - `render`  - line layout with difference brackets
// - `engine`  - lock-step read/compare/render loop

pub mod engine;
pub mod mask;
pub mod options;
pub mod overlay;
pub mod render;

pub use engine::{DiffEngine, DiffError, DiffStats, diff_all};
pub use mask::DiffMask;
pub use options::{DiffOptions, OptionsError, Overlays};
pub use overlay::Overlay;
pub use render::LineRenderer;
