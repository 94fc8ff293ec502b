//! Display model for the robot's energy

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::robot::MAX_ENERGY;

/// Where the bar floats above the ground
pub const BAR_POSITION: Vec3 = Vec3::new(150.0, 50.0, 0.0);
pub const BAR_THICKNESS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyBand {
    High,
    Medium,
    Low,
}

impl EnergyBand {
    pub fn from_energy(energy: i32) -> Self {
        if energy > 50 {
            EnergyBand::High
        } else if energy > 20 {
            EnergyBand::Medium
        } else {
            EnergyBand::Low
        }
    }

    pub fn color(self) -> [f32; 4] {
        match self {
            EnergyBand::High => [0.4, 1.0, 0.4, 1.0],
            EnergyBand::Medium => [1.0, 0.6, 0.0, 1.0],
            EnergyBand::Low => [0.8, 0.2, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBar {
    /// Bar length, twice the (capped) energy
    pub width: f32,
    pub band: EnergyBand,
}

impl EnergyBar {
    /// `None` once the robot has no energy left
    pub fn for_energy(energy: i32) -> Option<Self> {
        if energy <= 0 {
            return None;
        }
        let energy = energy.min(MAX_ENERGY);
        Some(Self {
            width: 2.0 * energy as f32,
            band: EnergyBand::from_energy(energy),
        })
    }

    /// Box extents; the length runs along z
    pub fn size(&self) -> Vec3 {
        Vec3::new(BAR_THICKNESS, BAR_THICKNESS, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(EnergyBand::from_energy(100), EnergyBand::High);
        assert_eq!(EnergyBand::from_energy(51), EnergyBand::High);
        assert_eq!(EnergyBand::from_energy(50), EnergyBand::Medium);
        assert_eq!(EnergyBand::from_energy(21), EnergyBand::Medium);
        assert_eq!(EnergyBand::from_energy(20), EnergyBand::Low);
        assert_eq!(EnergyBand::from_energy(1), EnergyBand::Low);
    }

    #[test]
    fn test_width_is_capped() {
        let bar = EnergyBar::for_energy(150).expect("positive energy");
        assert_eq!(bar.width, 200.0);
        let bar = EnergyBar::for_energy(35).expect("positive energy");
        assert_eq!(bar.width, 70.0);
        assert_eq!(bar.band, EnergyBand::Medium);
        assert_eq!(bar.size(), Vec3::new(10.0, 10.0, 70.0));
    }

    #[test]
    fn test_no_bar_when_empty() {
        assert_eq!(EnergyBar::for_energy(0), None);
        assert_eq!(EnergyBar::for_energy(-10), None);
    }
}
