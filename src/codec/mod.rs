// Text codecs used by the diff overlays and the one-shot CLI commands.
//
// - `base40`     - packed base-40 text, three characters per 16-bit word
// - `screencode` - platform screen codes to printable ASCII

pub mod base40;
pub mod screencode;

pub use base40::{Alphabet, Base40Error};
pub use screencode::ScreenCodeError;
