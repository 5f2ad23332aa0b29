//! Equipment shortage detection for a single hospital.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::Thresholds;
use crate::hospital::{EquipmentType, HospitalNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Normal,
    Warning,
    Critical,
}

/// Availability of one equipment type at the assessed hospital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentAssessment {
    pub equipment: EquipmentType,
    pub available: u32,
    pub total: u32,
    pub availability_ratio: f64,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalityAssessment {
    pub hospital_id: String,
    /// Evaluated entries in equipment order; unusable entries are omitted.
    pub entries: Vec<EquipmentAssessment>,
    pub critical_types: BTreeSet<EquipmentType>,
    pub priority: PriorityLevel,
}

impl CriticalityAssessment {
    pub fn is_critical(&self) -> bool {
        self.priority == PriorityLevel::Critical
    }

    /// Lowest availability ratio across evaluated entries.
    pub fn worst_ratio(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|entry| entry.availability_ratio)
            .min_by(f64::total_cmp)
    }
}

/// Classifies a hospital's equipment against the configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct CriticalityDetector {
    thresholds: Thresholds,
}

impl CriticalityDetector {
    /// Creates a detector using `thresholds` for every assessment.
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn assess(&self, hospital: &HospitalNode) -> CriticalityAssessment {
        let entries: Vec<EquipmentAssessment> = hospital
            .equipment_status
            .iter()
            .filter_map(|(&equipment, status)| {
                let ratio = status.ratio()?;
                Some(EquipmentAssessment {
                    equipment,
                    available: status.available,
                    total: status.total,
                    availability_ratio: ratio,
                    is_critical: ratio < self.thresholds.critical_ratio,
                })
            })
            .collect();

        let critical_types = entries
            .iter()
            .filter(|entry| entry.is_critical)
            .map(|entry| entry.equipment)
            .collect();

        let worst = entries
            .iter()
            .map(|entry| entry.availability_ratio)
            .min_by(f64::total_cmp);

        let priority = match worst {
            Some(ratio) if ratio < self.thresholds.critical_ratio => PriorityLevel::Critical,
            Some(ratio) if ratio < self.thresholds.warning_ratio => PriorityLevel::Warning,
            _ => PriorityLevel::Normal,
        };

        CriticalityAssessment {
            hospital_id: hospital.id.clone(),
            entries,
            critical_types,
            priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::Coordinate;

    fn hospital() -> HospitalNode {
        HospitalNode::new("a", "Hospital A", Coordinate::new(36.13, -115.13))
    }

    #[test]
    fn test_no_equipment_is_normal() {
        let assessment = CriticalityDetector::default().assess(&hospital());
        assert!(assessment.critical_types.is_empty());
        assert_eq!(assessment.priority, PriorityLevel::Normal);
        assert_eq!(assessment.worst_ratio(), None);
    }

    #[test]
    fn test_ventilator_shortage_is_critical() {
        let node = hospital()
            .with_equipment(EquipmentType::Ventilator, 2, 10)
            .with_equipment(EquipmentType::Monitor, 8, 10);
        let assessment = CriticalityDetector::default().assess(&node);

        assert_eq!(assessment.priority, PriorityLevel::Critical);
        assert!(assessment.is_critical());
        assert_eq!(
            assessment.critical_types.iter().copied().collect::<Vec<_>>(),
            vec![EquipmentType::Ventilator]
        );
        assert_eq!(assessment.entries.len(), 2);
    }

    #[test]
    fn test_warning_band() {
        let node = hospital()
            .with_equipment(EquipmentType::Ventilator, 4, 10)
            .with_equipment(EquipmentType::Monitor, 9, 10);
        let assessment = CriticalityDetector::default().assess(&node);
        assert_eq!(assessment.priority, PriorityLevel::Warning);
        assert!(assessment.critical_types.is_empty());
    }

    #[test]
    fn test_exact_threshold_is_not_critical() {
        let node = hospital().with_equipment(EquipmentType::Ventilator, 3, 10);
        let assessment = CriticalityDetector::default().assess(&node);
        assert_eq!(assessment.priority, PriorityLevel::Warning);
        assert!(assessment.critical_types.is_empty());

        let node = hospital().with_equipment(EquipmentType::Ventilator, 5, 10);
        let assessment = CriticalityDetector::default().assess(&node);
        assert_eq!(assessment.priority, PriorityLevel::Normal);
    }

    #[test]
    fn test_unusable_entries_are_skipped() {
        let node = hospital()
            .with_equipment(EquipmentType::Ventilator, 0, 0)
            .with_equipment(EquipmentType::Ecmo, 5, 2)
            .with_equipment(EquipmentType::Monitor, 7, 10);
        let assessment = CriticalityDetector::default().assess(&node);

        assert_eq!(assessment.entries.len(), 1);
        assert_eq!(assessment.entries[0].equipment, EquipmentType::Monitor);
        assert_eq!(assessment.priority, PriorityLevel::Normal);
    }

    #[test]
    fn test_ratios_stay_in_unit_interval() {
        let mut node = hospital();
        for (i, equipment) in EquipmentType::ALL.iter().enumerate() {
            let total = (i as u32 + 1) * 3;
            node = node.with_equipment(*equipment, total / 2, total);
        }
        let assessment = CriticalityDetector::default().assess(&node);
        for entry in &assessment.entries {
            assert!((0.0..=1.0).contains(&entry.availability_ratio));
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            critical_ratio: 0.5,
            warning_ratio: 0.8,
            ..Thresholds::default()
        };
        let node = hospital().with_equipment(EquipmentType::Ventilator, 4, 10);
        let assessment = CriticalityDetector::new(thresholds).assess(&node);
        assert_eq!(assessment.priority, PriorityLevel::Critical);
    }
}
