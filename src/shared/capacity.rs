/// Gallons per liter
pub const GALLONS_PER_LITER: f64 = 0.264172;

pub fn gallons_to_liters(gallons: f64) -> f64 {
    gallons / GALLONS_PER_LITER
}

pub fn liters_to_gallons(liters: f64) -> f64 {
    liters * GALLONS_PER_LITER
}

/// Whether the tank has any reheating left to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TankStatus {
    FullyHeated,
    Partial { percentage: f64, gallons: f64 },
}

/// Heated water left in the tank, derived from the latest deficit sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemainingState {
    pub capacity_liters: f64,
    pub remaining_liters: f64,
    pub remaining_gallons: f64,
    pub remaining_percentage: f64,
    pub shower_minutes: u32,
    /// True only when the deficit sample is exactly zero
    pub fully_heated: bool,
}

impl RemainingState {
    pub fn status(&self) -> TankStatus {
        if self.fully_heated {
            TankStatus::FullyHeated
        } else {
            TankStatus::Partial {
                percentage: self.remaining_percentage,
                gallons: self.remaining_gallons,
            }
        }
    }

    /// Spoken answer to "how much hot water is left"
    pub fn describe_remaining(&self) -> String {
        match self.status() {
            TankStatus::FullyHeated => "Your hot water is fully heated. ".to_string(),
            TankStatus::Partial {
                percentage,
                gallons,
            } => format!(
                "You have {:3.0} percent remaining, or {:3.0} gallons of hot water. ",
                percentage, gallons
            ),
        }
    }

    /// Spoken answer to "how long can I shower"
    pub fn describe_shower(&self) -> String {
        format!("You can shower for {} minutes.", self.shower_minutes)
    }
}

/// Estimate remaining hot water from a deficit sample
///
/// `deficit_liters` is zero for a full tank and negative as hot water is drawn
/// down. A deficit larger than the tank clamps to an empty tank.
pub fn estimate(
    capacity_gallons: f64,
    deficit_liters: f64,
    flow_liters_per_minute: f64,
) -> RemainingState {
    let capacity_liters = gallons_to_liters(capacity_gallons);
    let remaining_liters = (capacity_liters + deficit_liters).max(0.0);
    let remaining_gallons = liters_to_gallons(remaining_liters);
    let remaining_percentage = (remaining_gallons / capacity_gallons) * 100.0;

    let shower_minutes = if flow_liters_per_minute > 0.0 {
        // Saturating float-to-int cast; remaining is non-negative
        (remaining_liters / flow_liters_per_minute).floor() as u32
    } else {
        0
    };

    RemainingState {
        capacity_liters,
        remaining_liters,
        remaining_gallons,
        remaining_percentage,
        shower_minutes,
        fully_heated: deficit_liters == 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_fully_heated_regardless_of_flow() {
        for flow in [1.0, 8.4, 20.0] {
            let state = estimate(50.0, 0.0, flow);
            assert!(state.fully_heated);
            assert_eq!(state.status(), TankStatus::FullyHeated);
            assert!(state.describe_remaining().contains("fully heated"));
        }
    }

    #[test]
    fn test_partial_tank() {
        let state = estimate(50.0, -20.0, 8.4);

        assert!(approx(state.capacity_liters, 189.27));
        assert!(approx(state.remaining_liters, 169.27));
        assert_eq!(state.shower_minutes, 20);
        assert!(!state.fully_heated);
    }

    #[test]
    fn test_partial_percentage_and_gallons() {
        let state = estimate(50.0, -20.0, 8.4);

        // 169.27 L is 44.72 gal of 50
        assert!(approx(state.remaining_gallons, 44.7166));
        assert!(approx(state.remaining_percentage, 89.433));
        assert_eq!(
            state.describe_remaining(),
            "You have  89 percent remaining, or  45 gallons of hot water. "
        );
    }

    #[test]
    fn test_full_tank_shower_minutes() {
        let state = estimate(50.0, 0.0, 8.4);
        // 189.27 / 8.4 = 22.53
        assert_eq!(state.shower_minutes, 22);
        assert_eq!(state.describe_shower(), "You can shower for 22 minutes.");
        assert!(approx(state.remaining_percentage, 100.0));
    }

    #[test]
    fn test_tiny_deficit_is_not_fully_heated() {
        let state = estimate(50.0, -0.0001, 8.4);
        assert!(!state.fully_heated);
    }

    #[test]
    fn test_deficit_beyond_capacity_clamps_to_empty() {
        let state = estimate(50.0, -500.0, 8.4);

        assert_eq!(state.remaining_liters, 0.0);
        assert_eq!(state.remaining_percentage, 0.0);
        assert_eq!(state.shower_minutes, 0);
        assert_eq!(state.describe_shower(), "You can shower for 0 minutes.");
    }

    #[test]
    fn test_zero_flow_rate_yields_zero_minutes() {
        let state = estimate(50.0, -20.0, 0.0);
        assert_eq!(state.shower_minutes, 0);
    }

    #[test]
    fn test_conversion_constant() {
        assert!(approx(gallons_to_liters(1.0), 3.785));
        assert!(approx(liters_to_gallons(3.785), 1.0));
    }
}
