pub mod autoplay;
pub mod headless;

pub use autoplay::AutoplayMode;
pub use headless::{HeadlessMode, HeadlessReport};
