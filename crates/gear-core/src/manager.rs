//! The parameter store.

use std::collections::BTreeMap;

use crate::{CalorimeterParameters, CalorimeterRegion, GearParameters, TpcParameters};

/// Process-wide store of detector parameters.
///
/// Holds at most one record per well-known slot (the TPC and the four
/// calorimeter regions) plus any number of uniquely keyed generic records.
/// Absence of a record is routine, so getters return `Option`.
///
/// The store is not internally synchronized; share it behind a lock if more
/// than one thread needs to mutate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GearMgr {
    tpc: Option<TpcParameters>,
    calorimeters: [Option<CalorimeterParameters>; 4],
    gear_parameters: BTreeMap<String, GearParameters>,
}

impl GearMgr {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no slot and no generic record is populated.
    pub fn is_empty(&self) -> bool {
        self.tpc.is_none()
            && self.calorimeters.iter().all(Option::is_none)
            && self.gear_parameters.is_empty()
    }

    pub fn tpc_parameters(&self) -> Option<&TpcParameters> {
        self.tpc.as_ref()
    }

    /// Set the TPC record, returning the one it replaces.
    pub fn set_tpc_parameters(&mut self, params: TpcParameters) -> Option<TpcParameters> {
        self.tpc.replace(params)
    }

    pub fn calorimeter_parameters(&self, region: CalorimeterRegion) -> Option<&CalorimeterParameters> {
        self.calorimeters[region.index()].as_ref()
    }

    /// Set the record for `region`, returning the one it replaces.
    pub fn set_calorimeter_parameters(
        &mut self,
        region: CalorimeterRegion,
        params: CalorimeterParameters,
    ) -> Option<CalorimeterParameters> {
        self.calorimeters[region.index()].replace(params)
    }

    pub fn gear_parameters(&self, key: &str) -> Option<&GearParameters> {
        self.gear_parameters.get(key)
    }

    /// Set the generic record under `key`, returning the one it replaces.
    pub fn set_gear_parameters(
        &mut self,
        key: impl Into<String>,
        params: GearParameters,
    ) -> Option<GearParameters> {
        self.gear_parameters.insert(key.into(), params)
    }

    /// Keys of the generic records, in sorted order.
    pub fn gear_parameter_keys(&self) -> impl Iterator<Item = &str> {
        self.gear_parameters.keys().map(String::as_str)
    }
}
