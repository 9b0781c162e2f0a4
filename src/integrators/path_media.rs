// Copyright @yucwang 2026

use crate::core::bsdf::BSDFQueryRecord;
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::interaction::Intersection;
use crate::core::medium::MediumQueryRecord;
use crate::core::phase::PhaseFunctionQueryRecord;
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::core::scene::{MediumId, Scene};
use crate::integrators::lighting::surface_emission;
use crate::integrators::PathSettings;
use crate::math::constants::{FLOAT_MAX, Float, PI};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Scattering events inside media before their roulette starts.
const FORCED_SCATTER_EVENTS: usize = 3;

/// Volumetric path tracer. Meshes carrying a medium are index-matched
/// boundaries; the walk toggles the current medium when crossing them and
/// samples free flights inside. Surface vertices behave as in `path`.
#[derive(Debug, Default)]
pub struct PathMediaIntegrator {
    settings: PathSettings,
}

/// Per-path state of the random walk.
struct Walk {
    li: RGBSpectrum,
    throughput: RGBSpectrum,
    bounces: usize,
    scatter_events: usize,
}

/// What happened on the segment travelled inside a medium.
enum Flight {
    Scattered(Ray3f),
    PassedThrough,
    Terminated,
}

impl PathMediaIntegrator {
    pub fn new(settings: PathSettings) -> Self {
        Self { settings }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(PathSettings::from_properties(props)?))
    }

    /// Tracks the segment of `ray` up to the next surface through `medium`.
    fn fly(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f,
           hit: Option<&Intersection>, medium: MediumId, walk: &mut Walk) -> Flight {
        let medium = scene.medium(medium);
        let segment = ray.with_max_t(hit.map_or(FLOAT_MAX, |its| its.t));
        let mut rec = MediumQueryRecord::new(ray.origin());
        let interacted = medium.sample_distance(&segment, &mut rec, sampler);
        let weight = rec.weight();

        if !interacted {
            walk.throughput *= weight;
            return if walk.throughput.is_black() { Flight::Terminated } else { Flight::PassedThrough };
        }

        walk.li += walk.throughput * weight * rec.sigma_a * rec.le;
        walk.throughput *= weight * rec.sigma_s;
        if walk.throughput.is_black() || self.settings.depth_reached(walk.bounces) {
            return Flight::Terminated;
        }

        let phase = match rec.phase_function {
            Some(phase) => phase,
            None => return Flight::Terminated,
        };
        let mut phase_rec = PhaseFunctionQueryRecord::new(ray.dir());
        let phase_weight = phase.sample(&mut phase_rec, &sampler.next_2d());
        if phase_weight <= 0.0 {
            return Flight::Terminated;
        }
        walk.throughput *= phase_weight;
        walk.scatter_events += 1;
        walk.bounces += 1;

        if walk.scatter_events > FORCED_SCATTER_EVENTS {
            let p = phase.eval(&phase_rec);
            let q = (4.0 * PI * p / walk.scatter_events as Float).min(0.95).max(0.05);
            if sampler.next_1d() >= q {
                return Flight::Terminated;
            }
            walk.throughput /= q;
        }
        if !walk.throughput.is_valid() {
            return Flight::Terminated;
        }

        Flight::Scattered(Ray3f::new(rec.p, phase_rec.wo, None, None))
    }
}

impl ComputationNode for PathMediaIntegrator {
    fn to_string(&self) -> String {
        format!("PathMediaIntegrator[{}]", self.settings.describe())
    }
}

impl Integrator for PathMediaIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let mut walk = Walk {
            li: RGBSpectrum::zero(),
            throughput: RGBSpectrum::one(),
            bounces: 0,
            scatter_events: 0,
        };
        let mut ray = *ray;
        // The camera is assumed to sit outside every medium.
        let mut medium: Option<MediumId> = None;

        loop {
            let hit = scene.ray_intersect(&ray);

            if let Some(current) = medium {
                match self.fly(scene, sampler, &ray, hit.as_ref(), current, &mut walk) {
                    Flight::Scattered(next) => {
                        ray = next;
                        continue;
                    }
                    Flight::PassedThrough => {}
                    Flight::Terminated => break,
                }
            }

            let its = match hit {
                Some(its) => its,
                None => {
                    walk.li += walk.throughput * scene.background(&ray);
                    break;
                }
            };

            if its.medium.is_some() {
                let entering = ray.dir().dot(&its.geo_frame.n) < 0.0;
                medium = if entering { its.medium } else { None };
                ray = Ray3f::new(its.p, ray.dir(), None, None);
                continue;
            }

            if let Some(emission) = surface_emission(scene, &ray, &its) {
                walk.li += walk.throughput * emission.radiance;
                break;
            }
            if self.settings.depth_reached(walk.bounces) {
                break;
            }

            let mut rec = BSDFQueryRecord::new(its.to_local(&-ray.dir())).with_uv(its.uv);
            let weight = scene.surface_bsdf(&its).sample(&mut rec, &sampler.next_2d());
            if weight.is_black() || !weight.is_valid() {
                break;
            }
            walk.throughput *= weight;
            walk.bounces += 1;
            ray = Ray3f::new(its.p, its.to_world(&rec.wo), None, None);

            if !self.settings.survives(walk.bounces, sampler, &mut walk.throughput) {
                break;
            }
        }

        walk.li
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::computation_node::SceneNode;
    use crate::core::medium::Medium;
    use crate::core::registry::Registry;
    use crate::core::scene::SceneBuilder;
    use crate::densities::constant::ConstantDensity;
    use crate::emitters::environment::EnvironmentEmitter;
    use crate::emitters::area::AreaEmitter;
    use crate::integrators::test_scenes::{self, LIT_FLOOR_RADIANCE};
    use crate::materials::lambertian_diffuse::LambertianDiffuse;
    use crate::math::constants::Vector3f;
    use crate::media::heterogeneous_medium::HeterogeneousMedium;
    use crate::media::homogeneous_medium::HomogeneousMedium;
    use crate::shapes::triangle_mesh::Mesh;

    fn unit_cube() -> Mesh {
        Mesh::cube("volume", Vector3f::new(-0.5, -0.5, -0.5), Vector3f::new(0.5, 0.5, 0.5), false)
    }

    fn sky_with_volume(medium: SceneNode) -> Scene {
        let mut builder = SceneBuilder::new();
        let volume = builder.add_mesh(unit_cube());
        builder.add_child(volume, medium).unwrap();
        builder.add_environment(Box::new(EnvironmentEmitter::new(RGBSpectrum::one()))).unwrap();
        builder.activate(&Registry::with_defaults()).unwrap()
    }

    fn through_cube() -> Ray3f {
        Ray3f::new(Vector3f::new(-2.0, 0.1, 0.2), Vector3f::x(), None, None)
    }

    #[test]
    fn test_vacuum_volume_matches_surfaces() {
        let mut builder = SceneBuilder::new();
        let floor = builder.add_mesh(Mesh::rectangle("floor",
                                                     Vector3f::new(3.0, -2.0, 0.0),
                                                     Vector3f::new(10.0, 0.0, 0.0),
                                                     Vector3f::new(0.0, 10.0, 0.0)));
        let light = builder.add_mesh(Mesh::rectangle("light",
                                                     Vector3f::new(0.0, 0.0, 1.0),
                                                     Vector3f::new(0.0, 1.0, 0.0),
                                                     Vector3f::new(1.0, 0.0, 0.0)));
        let volume = builder.add_mesh(Mesh::cube("volume",
                                                 Vector3f::new(-0.5, -0.5, 0.05),
                                                 Vector3f::new(0.5, 0.5, 0.5),
                                                 false));
        builder.add_child(floor, SceneNode::BSDF(Box::new(LambertianDiffuse::new(RGBSpectrum::splat(0.5))))).unwrap();
        builder.add_child(light, SceneNode::Emitter(Box::new(AreaEmitter::new(RGBSpectrum::one())))).unwrap();
        builder.add_child(volume, SceneNode::Medium(Box::new(
            HomogeneousMedium::new(RGBSpectrum::zero(), RGBSpectrum::zero())))).unwrap();
        let scene = builder.activate(&Registry::with_defaults()).unwrap();

        let (mean, _) = test_scenes::estimate(&PathMediaIntegrator::default(), &scene,
                                              &test_scenes::floor_ray(), 40000, 31);
        assert!((mean - LIT_FLOOR_RADIANCE).abs() < 0.01, "mean {}", mean);
    }

    #[test]
    fn test_absorbing_volume_attenuates_sky() {
        let scene = sky_with_volume(SceneNode::Medium(Box::new(
            HomogeneousMedium::new(RGBSpectrum::one(), RGBSpectrum::zero()))));
        let (mean, _) = test_scenes::estimate(&PathMediaIntegrator::default(), &scene,
                                              &through_cube(), 20000, 32);
        assert!((mean - (-1.0 as Float).exp()).abs() < 0.02, "mean {}", mean);
    }

    #[test]
    fn test_scattering_volume_conserves_energy() {
        let scene = sky_with_volume(SceneNode::Medium(Box::new(
            HomogeneousMedium::new(RGBSpectrum::zero(), RGBSpectrum::splat(2.0)))));
        let (mean, _) = test_scenes::estimate(&PathMediaIntegrator::default(), &scene,
                                              &through_cube(), 20000, 33);
        assert!((mean - 1.0).abs() < 0.05, "mean {}", mean);
    }

    #[test]
    fn test_emissive_volume() {
        let mut medium = HeterogeneousMedium::new(RGBSpectrum::zero(), 1.0, RGBSpectrum::splat(2.0));
        medium.add_child(SceneNode::Density(Box::new(
            ConstantDensity::new(1.0, RGBSpectrum::one())))).unwrap();

        let mut builder = SceneBuilder::new();
        let volume = builder.add_mesh(unit_cube());
        builder.add_child(volume, SceneNode::Medium(Box::new(medium))).unwrap();
        let scene = builder.activate(&Registry::with_defaults()).unwrap();

        // Pure absorber: emission times the probability of a collision.
        let expected = 2.0 * (1.0 - (-1.0 as Float).exp());
        let (mean, _) = test_scenes::estimate(&PathMediaIntegrator::default(), &scene,
                                              &through_cube(), 20000, 34);
        assert!((mean - expected).abs() < 0.04, "mean {}", mean);
    }
}
