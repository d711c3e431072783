pub mod device;
pub mod dtos;
pub mod photo;
pub mod types;

pub use device::DeviceEntity;
pub use photo::{AnalysisResult, NewPhoto, PhotoEntity};
pub use types::{Timestamp, Timestamps};
