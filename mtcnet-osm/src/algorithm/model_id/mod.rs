mod model_id_allocator;
pub mod model_id_assigner;
mod model_id_error;

pub use model_id_allocator::ModelIdAllocator;
pub use model_id_assigner::ModelIdAssigner;
pub use model_id_error::ModelIdError;
