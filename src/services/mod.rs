pub mod analysis;
pub mod device;
pub mod photo;
pub mod photo_repository;

pub use analysis::HttpAnalysisClient;
pub use device::DeviceService;
pub use photo::{PhotoService, UploadPhotoArgs, UploadedImage};
pub use photo_repository::SqlitePhotoRepository;

pub type DefaultPhotoService = PhotoService<DeviceService, SqlitePhotoRepository, HttpAnalysisClient>;
