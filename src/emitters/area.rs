// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::emitter::{Emitter, EmitterQueryRecord};
use crate::core::error::{RenderError, Result};
use crate::core::properties::PropertyList;
use crate::core::scene::{MeshId, Scene};
use crate::math::constants::{Float, PDF_EPSILON, Vector2f};
use crate::math::spectrum::RGBSpectrum;

/// Diffuse emitter attached to one mesh. Emits only on the side its
/// shading normal faces.
pub struct AreaEmitter {
    radiance: RGBSpectrum,
    scale: Float,
    mesh: Option<MeshId>,
}

impl AreaEmitter {
    pub fn new(radiance: RGBSpectrum) -> Self {
        Self { radiance, scale: 1.0, mesh: None }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self {
            radiance: props.get_color("radiance", RGBSpectrum::one())?,
            scale: props.get_float("scale", 1.0)?,
            mesh: None,
        })
    }

    fn facing(rec: &EmitterQueryRecord) -> Float {
        rec.n.dot(&(-rec.wi))
    }
}

impl ComputationNode for AreaEmitter {
    fn to_string(&self) -> String {
        format!("AreaEmitter[radiance = {:?}, scale = {}]", self.radiance, self.scale)
    }
}

impl Emitter for AreaEmitter {
    fn sample(&self, scene: &Scene, rec: &mut EmitterQueryRecord, sample: &Vector2f, _extra: Float) -> RGBSpectrum {
        let mesh = match self.mesh {
            Some(id) => scene.mesh(id),
            None => return RGBSpectrum::zero(),
        };

        let position = mesh.sample_position(sample);
        rec.p = position.p;
        rec.n = position.n;
        rec.uv = position.uv;

        let d = rec.p - rec.reference;
        rec.dist = d.norm();
        if rec.dist <= 0.0 {
            return RGBSpectrum::zero();
        }
        rec.wi = d / rec.dist;
        rec.pdf = self.pdf(scene, rec);
        if rec.pdf <= PDF_EPSILON {
            return RGBSpectrum::zero();
        }

        self.eval(rec)
    }

    fn eval(&self, rec: &EmitterQueryRecord) -> RGBSpectrum {
        if Self::facing(rec) <= 0.0 {
            return RGBSpectrum::zero();
        }
        self.radiance * self.scale
    }

    fn pdf(&self, scene: &Scene, rec: &EmitterQueryRecord) -> Float {
        let mesh = match self.mesh {
            Some(id) => scene.mesh(id),
            None => return 0.0,
        };

        let cos_theta = Self::facing(rec);
        if cos_theta <= 0.0 {
            return 0.0;
        }
        mesh.pdf(&rec.p) * rec.dist * rec.dist / cos_theta
    }

    fn set_parent(&mut self, mesh: MeshId) -> Result<()> {
        if self.mesh.is_some() {
            return Err(RenderError::Configuration(String::from(
                "An area emitter can only be attached to one mesh")));
        }
        self.mesh = Some(mesh);
        Ok(())
    }

    fn parent(&self) -> Option<MeshId> {
        self.mesh
    }

    fn activate(&self) -> Result<()> {
        if self.mesh.is_none() {
            return Err(RenderError::Configuration(String::from(
                "There is no mesh attached to this area emitter")));
        }
        Ok(())
    }
}
