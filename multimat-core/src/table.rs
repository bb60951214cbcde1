//! Piecewise elastic tensor lookup by mesh region.
//!
//! The table is sized once for region ids `1..=n` and filled before any
//! assembly or stress recovery. Missing entries are errors, never zero
//! stiffness.

use crate::config::MaterialConfig;
use crate::error::{Error, Result};
use crate::material::ElasticConstants;
use crate::types::{ElasticTensor, RegionId};

/// Material constants bound to a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialAssignment {
    pub region: RegionId,
    pub constants: ElasticConstants,
}

/// Region id to elastic tensor map, contiguous storage indexed by `region - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTensorTable {
    slots: Vec<Option<ElasticTensor>>,
}

impl MaterialTensorTable {
    /// Empty table with slots for regions `1..=n_regions`.
    pub fn with_regions(n_regions: RegionId) -> Self {
        Self {
            slots: vec![None; n_regions as usize],
        }
    }

    /// Number of region slots.
    pub fn n_regions(&self) -> RegionId {
        self.slots.len() as RegionId
    }

    fn slot(&self, region: RegionId) -> Option<usize> {
        let idx = (region as usize).checked_sub(1)?;
        (idx < self.slots.len()).then_some(idx)
    }

    /// Set the tensor for a region, returning the tensor it replaced.
    pub fn insert(&mut self, region: RegionId, tensor: ElasticTensor) -> Result<Option<ElasticTensor>> {
        let idx = self.slot(region).ok_or(Error::RegionOutOfRange {
            region,
            n_regions: self.n_regions(),
        })?;
        Ok(self.slots[idx].replace(tensor))
    }

    /// Tensor for a region.
    pub fn lookup(&self, region: RegionId) -> Result<&ElasticTensor> {
        self.slot(region)
            .and_then(|idx| self.slots[idx].as_ref())
            .ok_or(Error::MissingRegionMapping { region })
    }

    /// Whether a region has a tensor.
    pub fn contains(&self, region: RegionId) -> bool {
        self.lookup(region).is_ok()
    }

    /// Check that every region in `1..=max_region` is mapped.
    pub fn validate_complete(&self, max_region: RegionId) -> Result<()> {
        match (1..=max_region).find(|&r| !self.contains(r)) {
            Some(region) => Err(Error::MissingRegionMapping { region }),
            None => Ok(()),
        }
    }

    /// Mapped regions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &ElasticTensor)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (i as RegionId + 1, t)))
    }

    /// Build a complete table from configuration.
    ///
    /// Entries naming a `region` go there. The N entries without one take
    /// the last N region ids in order, so the `i`-th positional entry lands in
    /// region `max_region - N + 1 + i`. With `max_region = 2` and two
    /// positional materials, the first goes to region 1 and the second to
    /// region 2.
    pub fn from_config(config: &MaterialConfig, max_region: RegionId) -> Result<Self> {
        let n = config.materials.iter().filter(|m| m.region.is_none()).count() as RegionId;
        let first = max_region.saturating_add(1).checked_sub(n).filter(|&r| r >= 1).ok_or(
            Error::RegionOutOfRange {
                region: 0,
                n_regions: max_region,
            },
        )?;

        let mut next_positional = first;
        let assignments = config
            .materials
            .iter()
            .map(|spec| {
                let region = match spec.region {
                    Some(region) => region,
                    None => {
                        let region = next_positional;
                        next_positional = next_positional.saturating_add(1);
                        region
                    }
                };
                Ok(MaterialAssignment {
                    region,
                    constants: spec.constants()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        build_material_table(&assignments, max_region)
    }
}

/// Build a table for regions `1..=max_region` and validate it is complete.
///
/// Later assignments to the same region overwrite earlier ones.
pub fn build_material_table(
    materials: &[MaterialAssignment],
    max_region: RegionId,
) -> Result<MaterialTensorTable> {
    let mut table = MaterialTensorTable::with_regions(max_region);
    for m in materials {
        let tensor = m.constants.elasticity_tensor();
        if table.insert(m.region, tensor)?.is_some() {
            log::debug!("region {} material overwritten", m.region);
        }
        log::debug!(
            "region {}: E = {:e}, nu = {}, lambda = {:e}, mu = {:e}",
            m.region,
            m.constants.youngs_modulus(),
            m.constants.poissons_ratio(),
            m.constants.lame_lambda(),
            m.constants.lame_mu()
        );
    }
    table.validate_complete(max_region)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaterialSpec;
    use crate::material::build_elasticity_tensor;

    fn assignment(region: RegionId, e: f64) -> MaterialAssignment {
        MaterialAssignment {
            region,
            constants: ElasticConstants::new(e, 0.3).unwrap(),
        }
    }

    #[test]
    fn test_lookup_unpopulated_region_fails() {
        let table = MaterialTensorTable::with_regions(3);
        assert!(matches!(
            table.lookup(2),
            Err(Error::MissingRegionMapping { region: 2 })
        ));
        assert!(matches!(
            table.lookup(0),
            Err(Error::MissingRegionMapping { region: 0 })
        ));
        assert!(matches!(
            table.lookup(7),
            Err(Error::MissingRegionMapping { region: 7 })
        ));
    }

    #[test]
    fn test_insert_lookup_roundtrip() {
        let mut table = MaterialTensorTable::with_regions(2);
        let tensor = build_elasticity_tensor(1000e3, 0.3).unwrap();
        assert!(table.insert(2, tensor).unwrap().is_none());
        assert_eq!(*table.lookup(2).unwrap(), tensor);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut table = MaterialTensorTable::with_regions(1);
        let stiff = build_elasticity_tensor(1000e3, 0.3).unwrap();
        let soft = build_elasticity_tensor(200e3, 0.3).unwrap();
        table.insert(1, stiff).unwrap();
        assert_eq!(table.insert(1, soft).unwrap(), Some(stiff));
        assert_eq!(*table.lookup(1).unwrap(), soft);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut table = MaterialTensorTable::with_regions(2);
        let tensor = build_elasticity_tensor(1.0, 0.3).unwrap();
        assert!(matches!(
            table.insert(0, tensor),
            Err(Error::RegionOutOfRange { region: 0, .. })
        ));
        assert!(matches!(
            table.insert(3, tensor),
            Err(Error::RegionOutOfRange { region: 3, n_regions: 2 })
        ));
    }

    #[test]
    fn test_validate_complete_reports_first_gap() {
        let table = build_material_table(&[assignment(1, 1.0)], 1).unwrap();
        assert!(table.validate_complete(1).is_ok());
        assert!(matches!(
            table.validate_complete(2),
            Err(Error::MissingRegionMapping { region: 2 })
        ));

        let partial = build_material_table(&[assignment(1, 1.0), assignment(3, 1.0)], 3);
        assert!(matches!(
            partial,
            Err(Error::MissingRegionMapping { region: 2 })
        ));
    }

    #[test]
    fn test_iter_in_region_order() {
        let table = build_material_table(&[assignment(2, 2.0), assignment(1, 1.0)], 2).unwrap();
        let regions: Vec<_> = table.iter().map(|(r, _)| r).collect();
        assert_eq!(regions, vec![1, 2]);
    }

    #[test]
    fn test_from_config_positional_tail() {
        // Two positional materials over three regions take regions 2 and 3,
        // so region 1 needs an explicit entry.
        let mut config = MaterialConfig::two_material_beam();
        assert!(matches!(
            MaterialTensorTable::from_config(&config, 3),
            Err(Error::MissingRegionMapping { region: 1 })
        ));

        config.materials.push(MaterialSpec::isotropic(50e3, 0.2).in_region(1));
        let table = MaterialTensorTable::from_config(&config, 3).unwrap();
        assert_eq!(*table.lookup(1).unwrap(), build_elasticity_tensor(50e3, 0.2).unwrap());
        assert_eq!(*table.lookup(2).unwrap(), build_elasticity_tensor(1000e3, 0.3).unwrap());
        assert_eq!(*table.lookup(3).unwrap(), build_elasticity_tensor(200e3, 0.3).unwrap());
    }

    #[test]
    fn test_from_config_explicit_entry_first() {
        let json = r#"{
            "materials": [
                { "region": 2, "youngs_modulus": 200e3, "poissons_ratio": 0.3 },
                { "youngs_modulus": 1000e3, "poissons_ratio": 0.3 }
            ]
        }"#;
        let config = MaterialConfig::from_json_str(json).unwrap();
        let table = MaterialTensorTable::from_config(&config, 2).unwrap();
        assert_eq!(*table.lookup(1).unwrap(), build_elasticity_tensor(1000e3, 0.3).unwrap());
        assert_eq!(*table.lookup(2).unwrap(), build_elasticity_tensor(200e3, 0.3).unwrap());
    }

    #[test]
    fn test_from_config_all_explicit() {
        let config = MaterialConfig {
            materials: vec![
                MaterialSpec::isotropic(3.0, 0.1).in_region(3),
                MaterialSpec::isotropic(1.0, 0.1).in_region(1),
                MaterialSpec::isotropic(2.0, 0.1).in_region(2),
            ],
        };
        let table = MaterialTensorTable::from_config(&config, 3).unwrap();
        assert_eq!(*table.lookup(3).unwrap(), build_elasticity_tensor(3.0, 0.1).unwrap());
    }

    #[test]
    fn test_from_config_two_material_beam() {
        let table = MaterialTensorTable::from_config(&MaterialConfig::two_material_beam(), 2).unwrap();
        let stiff = build_elasticity_tensor(1000e3, 0.3).unwrap();
        let soft = build_elasticity_tensor(200e3, 0.3).unwrap();
        assert_eq!(*table.lookup(1).unwrap(), stiff);
        assert_eq!(*table.lookup(2).unwrap(), soft);
    }

    #[test]
    fn test_from_config_too_many_materials() {
        let result = MaterialTensorTable::from_config(&MaterialConfig::two_material_beam(), 1);
        assert!(matches!(result, Err(Error::RegionOutOfRange { .. })));
    }

    #[test]
    fn test_from_config_invalid_material() {
        let config = MaterialConfig {
            materials: vec![MaterialSpec::isotropic(1.0, 0.5)],
        };
        assert!(matches!(
            MaterialTensorTable::from_config(&config, 1),
            Err(Error::InvalidMaterialParameter { .. })
        ));
    }

    #[test]
    fn test_table_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MaterialTensorTable>();
    }
}
