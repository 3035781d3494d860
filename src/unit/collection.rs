//! Ordered collection of committed units.

use serde::{Deserialize, Serialize};

use super::{UnitId, UnitRecord};
use crate::error::ReportError;

/// Units in the order they were added.
///
/// Updates replace a record in place, so editing never reorders the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCollection {
    units: Vec<UnitRecord>,
}

impl UnitCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit. Rejects an id that is already present.
    pub fn add(&mut self, unit: UnitRecord) -> Result<(), ReportError> {
        if self.position(unit.id).is_some() {
            return Err(ReportError::Validation(format!(
                "Unit {} already exists",
                unit.id
            )));
        }
        self.units.push(unit);
        Ok(())
    }

    /// Replace the whole record stored under `id`, keeping its position.
    ///
    /// The stored record always keeps `id`, whatever id `unit` carries.
    pub fn update(&mut self, id: UnitId, mut unit: UnitRecord) -> Result<(), ReportError> {
        let index = self.position(id).ok_or(ReportError::NotFound(id))?;
        unit.id = id;
        self.units[index] = unit;
        Ok(())
    }

    /// Remove the unit with `id`. Absent ids are a no-op.
    pub fn delete(&mut self, id: UnitId) -> Option<UnitRecord> {
        let index = self.position(id)?;
        Some(self.units.remove(index))
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitRecord> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitRecord> {
        self.units.iter()
    }

    pub fn as_slice(&self) -> &[UnitRecord] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn position(&self, id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }
}

impl<'a> IntoIterator for &'a UnitCollection {
    type Item = &'a UnitRecord;
    type IntoIter = std::slice::Iter<'a, UnitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{UnitDraft, UnitField};
    use std::collections::HashSet;

    fn unit(location: &str) -> UnitRecord {
        let mut draft = UnitDraft::new();
        draft.set_field(UnitField::Location, location);
        draft.commit().unwrap()
    }

    fn locations(units: &UnitCollection) -> Vec<&str> {
        units.iter().map(|u| u.location.as_str()).collect()
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut units = UnitCollection::new();
        for name in ["RTU-1", "RTU-2", "RTU-3"] {
            units.add(unit(name)).unwrap();
        }
        assert_eq!(locations(&units), ["RTU-1", "RTU-2", "RTU-3"]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut units = UnitCollection::new();
        let a = unit("RTU-1");
        units.add(a.clone()).unwrap();
        assert!(matches!(units.add(a), Err(ReportError::Validation(_))));
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut units = UnitCollection::new();
        let a = unit("RTU-1");
        let b = unit("RTU-2");
        let c = unit("RTU-3");
        let b_id = b.id;
        for u in [a, b, c] {
            units.add(u).unwrap();
        }

        let mut draft = units.get(b_id).unwrap().edit();
        draft.set_field(UnitField::Location, "RTU-2 (north)");
        units.update(b_id, draft.commit().unwrap()).unwrap();

        assert_eq!(locations(&units), ["RTU-1", "RTU-2 (north)", "RTU-3"]);
        assert_eq!(units.as_slice()[1].id, b_id);
    }

    #[test]
    fn test_update_forces_target_id() {
        let mut units = UnitCollection::new();
        let a = unit("RTU-1");
        let a_id = a.id;
        units.add(a).unwrap();

        units.update(a_id, unit("Replacement")).unwrap();
        assert_eq!(units.as_slice()[0].id, a_id);
        assert_eq!(units.as_slice()[0].location, "Replacement");
    }

    #[test]
    fn test_update_missing_id() {
        let mut units = UnitCollection::new();
        units.add(unit("RTU-1")).unwrap();
        let stray = unit("Elsewhere");
        let err = units.update(stray.id, stray.clone()).unwrap_err();
        assert!(matches!(err, ReportError::NotFound(id) if id == stray.id));
        assert_eq!(locations(&units), ["RTU-1"]);
    }

    #[test]
    fn test_delete_preserves_remaining_order() {
        let mut units = UnitCollection::new();
        let ids: Vec<_> = ["A", "B", "C", "D"]
            .into_iter()
            .map(|n| {
                let u = unit(n);
                let id = u.id;
                units.add(u).unwrap();
                id
            })
            .collect();

        assert_eq!(units.delete(ids[1]).map(|u| u.location), Some("B".into()));
        assert!(units.delete(ids[1]).is_none());
        assert_eq!(locations(&units), ["A", "C", "D"]);
    }

    #[test]
    fn test_mixed_operations_keep_ids_unique() {
        let mut units = UnitCollection::new();
        let mut live = Vec::new();
        for i in 0..20 {
            let u = unit(&format!("Unit {}", i));
            live.push(u.id);
            units.add(u).unwrap();
            if i % 3 == 0 {
                let id = live.remove(0);
                units.delete(id);
            }
            if i % 4 == 0 {
                if let Some(&id) = live.last() {
                    let mut draft = units.get(id).unwrap().edit();
                    draft.economizer = true;
                    units.update(id, draft.commit().unwrap()).unwrap();
                }
            }
        }

        let ids: Vec<_> = units.iter().map(|u| u.id).collect();
        assert_eq!(ids, live);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
