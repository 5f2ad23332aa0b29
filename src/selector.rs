//! Nearest-supplier selection for critical equipment.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::Thresholds;
use crate::haversine::{Coordinate, distance_km};
use crate::hospital::{EquipmentType, HospitalNode};

/// A recommended transfer of one equipment type from a supplier hospital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPlan {
    pub equipment: EquipmentType,
    pub supplier_id: String,
    pub supplier_name: String,
    pub supplier_location: Coordinate,
    /// Straight-line distance to the requesting hospital.
    pub distance_km: f64,
    pub supplier_ratio: f64,
}

/// Chooses which hospital should supply a critical equipment type.
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    supplier_ratio: f64,
    tie_epsilon_km: f64,
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::new(&Thresholds::default())
    }
}

impl CandidateSelector {
    /// Creates a selector that accepts suppliers above `thresholds.supplier_ratio`.
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            supplier_ratio: thresholds.supplier_ratio,
            tie_epsilon_km: thresholds.tie_epsilon_km,
        }
    }

    /// Nearest hospital with surplus of `equipment`, excluding `exclude_id`.
    ///
    /// `None` means no hospital qualifies, which is not an error.
    pub fn find_nearest_supplier<'a>(
        &self,
        equipment: EquipmentType,
        exclude_id: &str,
        source: Coordinate,
        hospitals: &'a [HospitalNode],
    ) -> Option<(&'a HospitalNode, f64)> {
        hospitals
            .iter()
            .filter(|candidate| candidate.id != exclude_id)
            .filter(|candidate| {
                candidate
                    .availability_ratio(equipment)
                    .is_some_and(|ratio| ratio > self.supplier_ratio)
            })
            .map(|candidate| (candidate, distance_km(source, candidate.location)))
            .min_by(|a, b| self.rank(a, b))
    }

    /// One plan per critical equipment type that has a supplier, in equipment order.
    pub fn plan_transfers(
        &self,
        hospital: &HospitalNode,
        critical: &BTreeSet<EquipmentType>,
        hospitals: &[HospitalNode],
    ) -> Vec<TransferPlan> {
        let mut plans: Vec<TransferPlan> = critical
            .par_iter()
            .filter_map(|&equipment| {
                let (supplier, distance) =
                    self.find_nearest_supplier(equipment, &hospital.id, hospital.location, hospitals)?;
                Some(TransferPlan {
                    equipment,
                    supplier_id: supplier.id.clone(),
                    supplier_name: supplier.name.clone(),
                    supplier_location: supplier.location,
                    distance_km: distance,
                    supplier_ratio: supplier.availability_ratio(equipment).unwrap_or_default(),
                })
            })
            .collect();

        plans.sort_by_key(|plan| plan.equipment);
        plans
    }

    fn rank(&self, a: &(&HospitalNode, f64), b: &(&HospitalNode, f64)) -> Ordering {
        if (a.1 - b.1).abs() <= self.tie_epsilon_km {
            a.0.id.cmp(&b.0.id)
        } else {
            a.1.total_cmp(&b.1)
        }
    }
}
