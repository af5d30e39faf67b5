mod county;
mod highway;
mod mode_access;
mod model_id;

pub use county::{County, Geography};
pub use highway::Highway;
pub use mode_access::{parse_access_value, ModeAccess};
pub use model_id::{EntityKind, IdSpace, ModelIdRange, ModelLinkId, ModelNodeId};
