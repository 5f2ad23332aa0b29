//! Hospital network records as loaded from the directory provider.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::haversine::Coordinate;

/// Equipment tracked across the hospital network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    Ventilator,
    Monitor,
    InfusionPump,
    Defibrillator,
    Ecmo,
    DialysisMachine,
    Ultrasound,
    OxygenConcentrator,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 8] = [
        EquipmentType::Ventilator,
        EquipmentType::Monitor,
        EquipmentType::InfusionPump,
        EquipmentType::Defibrillator,
        EquipmentType::Ecmo,
        EquipmentType::DialysisMachine,
        EquipmentType::Ultrasound,
        EquipmentType::OxygenConcentrator,
    ];

    /// Stable identifier used in overlay names and serialized data.
    pub fn slug(self) -> &'static str {
        match self {
            EquipmentType::Ventilator => "ventilator",
            EquipmentType::Monitor => "monitor",
            EquipmentType::InfusionPump => "infusion_pump",
            EquipmentType::Defibrillator => "defibrillator",
            EquipmentType::Ecmo => "ecmo",
            EquipmentType::DialysisMachine => "dialysis_machine",
            EquipmentType::Ultrasound => "ultrasound",
            EquipmentType::OxygenConcentrator => "oxygen_concentrator",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EquipmentType::Ventilator => "Ventilator",
            EquipmentType::Monitor => "ICU Monitor",
            EquipmentType::InfusionPump => "Infusion Pump",
            EquipmentType::Defibrillator => "Defibrillator",
            EquipmentType::Ecmo => "ECMO",
            EquipmentType::DialysisMachine => "Dialysis Machine",
            EquipmentType::Ultrasound => "Ultrasound",
            EquipmentType::OxygenConcentrator => "Oxygen Concentrator",
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stock level for one equipment type at one hospital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentStatus {
    pub available: u32,
    pub total: u32,
}

impl EquipmentStatus {
    pub const fn new(available: u32, total: u32) -> Self {
        Self { available, total }
    }

    /// Fraction of stock available, in `[0, 1]`.
    ///
    /// Returns `None` for entries that cannot take part in analysis: an empty
    /// inventory (`total == 0`) or inconsistent data (`available > total`).
    pub fn ratio(&self) -> Option<f64> {
        if self.total == 0 || self.available > self.total {
            return None;
        }
        Some(f64::from(self.available) / f64::from(self.total))
    }
}

/// A hospital in the network snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalNode {
    pub id: String,
    pub name: String,
    pub location: Coordinate,
    #[serde(default)]
    pub equipment_status: BTreeMap<EquipmentType, EquipmentStatus>,
    #[serde(default)]
    pub occupancy_pct: f64,
}

impl HospitalNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            equipment_status: BTreeMap::new(),
            occupancy_pct: 0.0,
        }
    }

    pub fn with_equipment(mut self, equipment: EquipmentType, available: u32, total: u32) -> Self {
        self.equipment_status
            .insert(equipment, EquipmentStatus::new(available, total));
        self
    }

    pub fn with_occupancy(mut self, occupancy_pct: f64) -> Self {
        self.occupancy_pct = occupancy_pct;
        self
    }

    /// Availability ratio for one equipment type, if it can be evaluated.
    pub fn availability_ratio(&self, equipment: EquipmentType) -> Option<f64> {
        self.equipment_status
            .get(&equipment)
            .and_then(EquipmentStatus::ratio)
    }
}

/// Source of the current hospital network.
///
/// The engine reads one snapshot per selection cycle and never writes back.
pub trait HospitalDirectory {
    fn snapshot(&self) -> Vec<HospitalNode>;
}

impl HospitalDirectory for [HospitalNode] {
    fn snapshot(&self) -> Vec<HospitalNode> {
        self.to_vec()
    }
}

impl HospitalDirectory for Vec<HospitalNode> {
    fn snapshot(&self) -> Vec<HospitalNode> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_excludes_empty_inventory() {
        assert_eq!(EquipmentStatus::new(0, 0).ratio(), None);
    }

    #[test]
    fn test_ratio_excludes_inconsistent_entry() {
        assert_eq!(EquipmentStatus::new(12, 10).ratio(), None);
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(EquipmentStatus::new(0, 4).ratio(), Some(0.0));
        assert_eq!(EquipmentStatus::new(4, 4).ratio(), Some(1.0));
        assert_eq!(EquipmentStatus::new(2, 10).ratio(), Some(0.2));
    }

    #[test]
    fn test_deserialize_directory_record() {
        let json = r#"{
            "id": "h-1",
            "name": "Sunrise Hospital",
            "location": { "lat": 36.1335, "lng": -115.1364 },
            "equipmentStatus": {
                "ventilator": { "available": 2, "total": 10 },
                "infusion_pump": { "available": 30, "total": 40 }
            },
            "occupancyPct": 87.5
        }"#;
        let node: HospitalNode = serde_json::from_str(json).expect("parse hospital");
        assert_eq!(node.id, "h-1");
        assert_eq!(node.availability_ratio(EquipmentType::Ventilator), Some(0.2));
        assert_eq!(node.availability_ratio(EquipmentType::InfusionPump), Some(0.75));
        assert_eq!(node.availability_ratio(EquipmentType::Ecmo), None);
        assert_eq!(node.occupancy_pct, 87.5);
    }

    #[test]
    fn test_slugs_are_unique() {
        let mut slugs: Vec<_> = EquipmentType::ALL.iter().map(|e| e.slug()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), EquipmentType::ALL.len());
    }
}
