// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::emitter::{Emitter, EmitterQueryRecord};
use crate::core::error::Result;
use crate::core::properties::PropertyList;
use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{square_to_uniform_sphere, square_to_uniform_sphere_pdf};

/// Constant radiance arriving from every direction at infinity.
pub struct EnvironmentEmitter {
    radiance: RGBSpectrum,
}

impl EnvironmentEmitter {
    pub fn new(radiance: RGBSpectrum) -> Self {
        Self { radiance }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_color("radiance", RGBSpectrum::one())?))
    }
}

impl ComputationNode for EnvironmentEmitter {
    fn to_string(&self) -> String {
        format!("EnvironmentEmitter[radiance = {:?}]", self.radiance)
    }
}

impl Emitter for EnvironmentEmitter {
    fn sample(&self, scene: &Scene, rec: &mut EmitterQueryRecord, sample: &Vector2f, _extra: Float) -> RGBSpectrum {
        let wi = square_to_uniform_sphere(sample);
        *rec = EmitterQueryRecord::from_direction(rec.reference, wi);
        rec.pdf = self.pdf(scene, rec);

        self.eval(rec)
    }

    fn eval(&self, _rec: &EmitterQueryRecord) -> RGBSpectrum {
        self.radiance
    }

    fn pdf(&self, _scene: &Scene, rec: &EmitterQueryRecord) -> Float {
        square_to_uniform_sphere_pdf(&rec.wi)
    }

    fn is_environment(&self) -> bool {
        true
    }
}
