pub mod chart;
pub mod lunar;
pub mod normalizer;
pub mod resolver;
pub mod zodiac;

pub use crate::domain::model::{BirthRecord, SignPlacement, SignResolution, ZodiacSign};
pub use crate::domain::ports::{ConfigProvider, InterpretationService, Storage};
pub use crate::utils::error::Result;
