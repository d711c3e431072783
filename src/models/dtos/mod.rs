pub mod analysis;
pub mod device;
pub mod photo;
