//! Platform event translators.

mod winit;

pub use self::winit::WinitTranslator;
