//! Las Vegas area hospitals with a fixed equipment picture.
//!
//! Coordinates are the real campus locations. Inventory is invented so that:
//! - Sunrise is short on ventilators, infusion pumps and ECMO
//! - UMC is short on ICU monitors
//! - Summerlin has no shortage at all
//! - Nobody has ECMO surplus

use resource_router::haversine::Coordinate;
use resource_router::hospital::{EquipmentType, HospitalNode};

pub const SUNRISE: Coordinate = Coordinate::new(36.1335, -115.1364);
pub const UMC: Coordinate = Coordinate::new(36.1601, -115.1685);
pub const DESERT_SPRINGS: Coordinate = Coordinate::new(36.1154, -115.1163);
pub const VALLEY: Coordinate = Coordinate::new(36.1614, -115.1748);
pub const SUMMERLIN: Coordinate = Coordinate::new(36.1889, -115.2948);
pub const ST_ROSE_SIENA: Coordinate = Coordinate::new(36.0060, -115.1125);

/// Vendor warehouse used as the external supplier location.
pub const MEDICAL_DEPOT: Coordinate = Coordinate::new(36.0840, -115.1537);

pub fn network() -> Vec<HospitalNode> {
    use EquipmentType::*;

    vec![
        HospitalNode::new("sunrise", "Sunrise Hospital and Medical Center", SUNRISE)
            .with_equipment(Ventilator, 2, 10)
            .with_equipment(InfusionPump, 3, 20)
            .with_equipment(Ecmo, 0, 2)
            .with_equipment(Monitor, 16, 20)
            .with_equipment(Defibrillator, 4, 10)
            .with_occupancy(94.0),
        HospitalNode::new("umc", "University Medical Center", UMC)
            .with_equipment(Ventilator, 14, 20)
            .with_equipment(InfusionPump, 30, 40)
            .with_equipment(Ecmo, 1, 2)
            .with_equipment(Monitor, 3, 20)
            .with_occupancy(88.0),
        HospitalNode::new("desert-springs", "Desert Springs Hospital", DESERT_SPRINGS)
            .with_equipment(Ventilator, 9, 10)
            .with_equipment(InfusionPump, 10, 30)
            .with_equipment(Monitor, 0, 0)
            .with_occupancy(71.0),
        HospitalNode::new("valley", "Valley Hospital Medical Center", VALLEY)
            .with_equipment(Monitor, 18, 20)
            .with_equipment(Ventilator, 5, 10)
            .with_occupancy(65.0),
        HospitalNode::new("summerlin", "Summerlin Hospital", SUMMERLIN)
            .with_equipment(Ventilator, 12, 15)
            .with_equipment(Monitor, 14, 20)
            .with_occupancy(58.0),
        HospitalNode::new("st-rose-siena", "St. Rose Dominican Siena", ST_ROSE_SIENA)
            .with_equipment(InfusionPump, 25, 30)
            .with_equipment(Ventilator, 7, 10)
            .with_occupancy(62.0),
    ]
}
