use super::ModelIdError;
use crate::model::feature::{County, EntityKind, IdSpace};
use std::collections::HashMap;

/// hands out sequential ids from the per-county sub-ranges of one id space.
#[derive(Debug, Clone)]
pub struct ModelIdAllocator {
    space: IdSpace,
    issued: HashMap<(County, EntityKind), usize>,
}

impl ModelIdAllocator {
    pub fn new(space: IdSpace) -> ModelIdAllocator {
        ModelIdAllocator {
            space,
            issued: HashMap::new(),
        }
    }

    /// number of ids issued so far for a county and kind
    pub fn issued(&self, county: &County, kind: EntityKind) -> usize {
        self.issued.get(&(*county, kind)).copied().unwrap_or_default()
    }

    pub fn next_id(&mut self, county: &County, kind: EntityKind) -> Result<i64, ModelIdError> {
        let range = county.id_subrange(kind, self.space);
        let issued = self.issued.entry((*county, kind)).or_insert(0);
        if *issued >= range.capacity() {
            return Err(ModelIdError::RangeExceeded {
                county: *county,
                kind,
                count: *issued + 1,
                capacity: range.capacity(),
            });
        }
        let id = range.floor + *issued as i64;
        *issued += 1;
        Ok(id)
    }
}
