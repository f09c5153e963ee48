mod request;
mod response;

pub use request::ImageUpload;
pub use response::{
    CropInfo, CropsResponse, DeleteResponse, HealthResponse, SessionResponse, SoilCategoryInfo,
};
