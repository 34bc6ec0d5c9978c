use anyhow::bail;
use binforge_files::obj::types::ObjAsset;
use glam::{DMat3, DVec3};
use nalgebra::Matrix3;

// Integrals of x_i * x_j over the canonical tetrahedron (0, e1, e2, e3):
// 1/60 on the diagonal, 1/120 off it.
const CANONICAL_COVARIANCE: DMat3 = DMat3::from_cols(
    DVec3::new(1.0 / 60.0, 1.0 / 120.0, 1.0 / 120.0),
    DVec3::new(1.0 / 120.0, 1.0 / 60.0, 1.0 / 120.0),
    DVec3::new(1.0 / 120.0, 1.0 / 120.0, 1.0 / 60.0),
);

const DEGENERATE_VOLUME: f64 = 1e-12;

/// Unit-density mass properties of a closed triangle mesh, computed by
/// summing signed tetrahedra between each face and the origin.
///
/// The inertia tensor is taken about the center of mass. Density stays at 1,
/// matching what the descriptor pipeline feeds the simulator: the measured
/// mass and the geometric tensor are reported independently.
#[derive(Debug, Copy, Clone)]
pub struct MassProperties {
    pub volume: f64,
    pub center_mass: DVec3,
    pub inertia: DMat3,
}

impl MassProperties {
    pub fn compute(asset: &ObjAsset) -> anyhow::Result<MassProperties> {
        if asset.triangles.is_empty() {
            bail!("Mesh has no faces");
        }

        let mut volume = 0.0_f64;
        let mut first_moment = DVec3::ZERO;
        let mut covariance = DMat3::ZERO;

        for triangle in &asset.triangles {
            let [a, b, c] = asset.triangle_positions(triangle).map(|v| {
                DVec3::new(v.x as f64, v.y as f64, v.z as f64)
            });

            // 6 times the signed volume of the tetrahedron (0, a, b, c)
            let det = a.dot(b.cross(c));
            volume += det / 6.0;
            first_moment += det * (a + b + c) / 24.0;

            let edges = DMat3::from_cols(a, b, c);
            covariance += det * (edges * CANONICAL_COVARIANCE * edges.transpose());
        }

        // inverted winding yields a mirrored but consistent integral
        if volume < 0.0 {
            volume = -volume;
            first_moment = -first_moment;
            covariance = -covariance;
        }

        if volume < DEGENERATE_VOLUME {
            bail!("Mesh is degenerate (volume ~ 0), cannot derive inertia");
        }

        let center_mass = first_moment / volume;
        // shift the second moment to the center of mass (unit density: mass = volume)
        let centered = covariance - volume * outer(center_mass, center_mass);
        let trace = centered.x_axis.x + centered.y_axis.y + centered.z_axis.z;
        let inertia = DMat3::IDENTITY * trace - centered;

        Ok(MassProperties {
            volume,
            center_mass,
            inertia,
        })
    }

    /// Rotation whose rows are the principal axes of the inertia tensor.
    pub fn principal_rotation(&self) -> DMat3 {
        let eigen = Matrix3::from(self.inertia).symmetric_eigen();
        DMat3::from(eigen.eigenvectors).transpose()
    }

    /// The inertia tensor expressed in its principal frame: `R * I * R^T`.
    /// Off-diagonal terms end up numerically zero but are still reported,
    /// the descriptor format wants all six components.
    pub fn principal_inertia(&self) -> DMat3 {
        let rotation = self.principal_rotation();
        rotation * self.inertia * rotation.transpose()
    }
}

fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}
