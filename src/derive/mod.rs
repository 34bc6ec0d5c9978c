use rand::Rng;

use crate::props::SourceDimensions;

// Objects the gripper can actually handle: 0.1 kg <= mass <= 1 kg,
// 4 cm <= extent <= 7 cm.
pub const MASS_MIN: f64 = 0.1;
pub const MASS_MAX: f64 = 1.0;
pub const LONGITUDE_MIN: f64 = 0.04;
pub const LONGITUDE_MAX: f64 = 0.07;

// Fallback for assets without a spreadsheet row. All of these sit outside
// the envelope, so record-less assets always get randomized values.
pub const DEFAULT_MASS: f64 = 1.1;
pub const DEFAULT_DIMENSIONS: SourceDimensions = SourceDimensions {
    height: 0.08,
    radius_x: 0.08,
    radius_y: 0.09,
};

/// The simulation-ready body values after the envelope policy ran:
/// dimensions/mass inside the envelope pass through, anything outside is
/// replaced by a uniform sample from the envelope. The replacement is a
/// draw, not a rescale, so repeated runs produce different descriptors for
/// oversized objects.
#[derive(Debug, Copy, Clone)]
pub struct DerivedBody {
    pub mass: f64,
    pub height: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Uniform mesh scale mapping the smallest source extent onto its
    /// derived counterpart.
    pub scale_ratio: f64,
}

impl DerivedBody {
    pub fn bottom(&self) -> f64 {
        -self.height / 2.0
    }

    pub fn upper(&self) -> f64 {
        self.height / 2.0
    }

    pub fn radius(&self) -> f64 {
        self.radius_x.max(self.radius_y)
    }

    pub fn vertical_radius(&self) -> f64 {
        self.height
    }

    /// Smallest horizontal footprint, paired with the height in the batch
    /// report.
    pub fn min_diameter(&self) -> f64 {
        self.radius_x.min(self.radius_y) * 2.0
    }
}

pub fn derive_body<R: Rng>(rng: &mut R, mass: f64, dims: SourceDimensions) -> DerivedBody {
    let mass = resolve_mass(rng, mass);

    let height = resolve_height(rng, dims.height);
    let radius_x = resolve_radius(rng, dims.radius_x);
    let radius_y = resolve_radius(rng, dims.radius_y);

    let scale_ratio = scale_ratio(&dims, height, radius_x, radius_y);

    DerivedBody {
        mass,
        height,
        radius_x,
        radius_y,
        scale_ratio,
    }
}

pub fn resolve_mass<R: Rng>(rng: &mut R, mass: f64) -> f64 {
    if !(MASS_MIN..=MASS_MAX).contains(&mass) {
        rng.random_range(MASS_MIN..=MASS_MAX)
    } else {
        mass
    }
}

pub fn resolve_height<R: Rng>(rng: &mut R, height: f64) -> f64 {
    if !(LONGITUDE_MIN..=LONGITUDE_MAX).contains(&height) {
        rng.random_range(LONGITUDE_MIN..=LONGITUDE_MAX)
    } else {
        height
    }
}

/// Radii are half-extents: the out-of-envelope check still compares against
/// the full extent bound, while the replacement draws from the halved
/// envelope.
pub fn resolve_radius<R: Rng>(rng: &mut R, radius: f64) -> f64 {
    if radius > LONGITUDE_MAX || radius < LONGITUDE_MIN / 2.0 {
        rng.random_range(LONGITUDE_MIN / 2.0..=LONGITUDE_MAX / 2.0)
    } else {
        radius
    }
}

/// `derived(min extent) / min extent`, where ties between equal source
/// extents resolve in favour of the height, then radius_y, then radius_x.
fn scale_ratio(dims: &SourceDimensions, height: f64, radius_x: f64, radius_y: f64) -> f64 {
    let min = dims.height.min(dims.radius_x).min(dims.radius_y);

    let derived = if dims.height == min {
        height
    } else if dims.radius_y == min {
        radius_y
    } else {
        radius_x
    };

    derived / min
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x4249_4e46)
    }

    #[test]
    fn values_inside_the_envelope_pass_through() {
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(resolve_mass(&mut rng, 0.5), 0.5);
            assert_eq!(resolve_height(&mut rng, 0.05), 0.05);
            assert_eq!(resolve_radius(&mut rng, 0.03), 0.03);
        }
    }

    #[test]
    fn envelope_bounds_are_inclusive() {
        let mut rng = rng();
        assert_eq!(resolve_mass(&mut rng, MASS_MIN), MASS_MIN);
        assert_eq!(resolve_mass(&mut rng, MASS_MAX), MASS_MAX);
        assert_eq!(resolve_height(&mut rng, LONGITUDE_MAX), LONGITUDE_MAX);
    }

    #[test]
    fn oversized_values_resample_inside_the_envelope() {
        let mut rng = rng();
        for _ in 0..100 {
            let mass = resolve_mass(&mut rng, 1.1);
            assert!((MASS_MIN..=MASS_MAX).contains(&mass));
            assert_ne!(mass, 1.1);

            let height = resolve_height(&mut rng, 0.08);
            assert!((LONGITUDE_MIN..=LONGITUDE_MAX).contains(&height));
            assert_ne!(height, 0.08);

            // radii resample from the halved envelope
            let radius = resolve_radius(&mut rng, 0.09);
            assert!((LONGITUDE_MIN / 2.0..=LONGITUDE_MAX / 2.0).contains(&radius));
        }
    }

    #[test]
    fn scale_ratio_tracks_the_smallest_source_extent() {
        let dims = SourceDimensions {
            height: 0.06,
            radius_x: 0.03,
            radius_y: 0.05,
        };
        // radius_x is smallest and in-envelope, so the ratio is 1
        let body = derive_body(&mut rng(), 0.5, dims);
        assert_eq!(body.scale_ratio, 1.0);

        // oversized min extent: ratio maps it onto the resampled value
        let dims = SourceDimensions {
            height: 0.09,
            radius_x: 0.10,
            radius_y: 0.12,
        };
        let body = derive_body(&mut rng(), 0.5, dims);
        assert_eq!(body.scale_ratio, body.height / 0.09);
        assert!(body.scale_ratio < 1.0);
    }

    #[test]
    fn scale_ratio_ties_prefer_height_then_radius_y() {
        // all three equal: the height's derived value wins
        let dims = SourceDimensions {
            height: 0.08,
            radius_x: 0.08,
            radius_y: 0.08,
        };
        let body = derive_body(&mut rng(), 0.5, dims);
        assert_eq!(body.scale_ratio, body.height / 0.08);

        // radii tied below the height: radius_y wins
        let dims = SourceDimensions {
            height: 0.095,
            radius_x: 0.09,
            radius_y: 0.09,
        };
        let body = derive_body(&mut rng(), 0.5, dims);
        assert_eq!(body.scale_ratio, body.radius_y / 0.09);
    }

    #[test]
    fn derived_text_values_follow_the_randomized_height() {
        let dims = SourceDimensions {
            height: 0.05,
            radius_x: 0.02,
            radius_y: 0.03,
        };
        let body = derive_body(&mut rng(), 0.5, dims);

        assert_eq!(body.bottom(), -0.025);
        assert_eq!(body.upper(), 0.025);
        assert_eq!(body.radius(), 0.03);
        assert_eq!(body.vertical_radius(), 0.05);
        assert_eq!(body.min_diameter(), 0.04);
    }

    #[test]
    fn kit_defaults_always_randomize() {
        let mut rng = rng();
        for _ in 0..20 {
            let body = derive_body(&mut rng, DEFAULT_MASS, DEFAULT_DIMENSIONS);
            assert!((MASS_MIN..=MASS_MAX).contains(&body.mass));
            assert!((LONGITUDE_MIN..=LONGITUDE_MAX).contains(&body.height));
            assert!(body.radius_x <= LONGITUDE_MAX / 2.0);
            assert!(body.radius_y <= LONGITUDE_MAX / 2.0);
        }
    }
}
