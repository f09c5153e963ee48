mod analysis;
mod crops;
mod health;
mod sessions;

pub use analysis::{run_image_analysis, run_manual_analysis};
pub use crops::list_crops;
pub use health::health_check;
pub use sessions::{
    create_session, delete_session, get_draft, get_outcome, reset_session, update_draft,
};
