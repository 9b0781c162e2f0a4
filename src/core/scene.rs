// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::computation_node::{ComputationNode, SceneNode};
use crate::core::emitter::{Emitter, EmitterQueryRecord};
use crate::core::error::{RenderError, Result};
use crate::core::interaction::Intersection;
use crate::core::medium::Medium;
use crate::core::properties::PropertyList;
use crate::core::registry::Registry;
use crate::math::aabb::AABB;
use crate::math::constants::Float;
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::shapes::triangle_mesh::Mesh;

/// Index of a mesh (and its attachments) inside a `Scene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BsdfId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmitterId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediumId(pub usize);

/// A mesh with the objects attached to it. Every object has a BSDF once
/// the scene is activated.
pub struct SceneObject {
    pub mesh: Mesh,
    pub bsdf: BsdfId,
    pub emitter: Option<EmitterId>,
    pub medium: Option<MediumId>,
}

/// Activated, immutable scene shared by all render workers.
pub struct Scene {
    objects: Vec<SceneObject>,
    bsdfs: Vec<Box<dyn BSDF>>,
    emitters: Vec<Box<dyn Emitter>>,
    media: Vec<Box<dyn Medium>>,
    environment: Option<EmitterId>,
    background: RGBSpectrum,
    scene_bounds: AABB,
}

impl Scene {
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: MeshId) -> &SceneObject {
        &self.objects[id.0]
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.objects[id.0].mesh
    }

    pub fn bsdf(&self, id: BsdfId) -> &dyn BSDF {
        self.bsdfs[id.0].as_ref()
    }

    pub fn emitter(&self, id: EmitterId) -> &dyn Emitter {
        self.emitters[id.0].as_ref()
    }

    pub fn medium(&self, id: MediumId) -> &dyn Medium {
        self.media[id.0].as_ref()
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    pub fn environment(&self) -> Option<EmitterId> {
        self.environment
    }

    pub fn scene_bounds(&self) -> &AABB {
        &self.scene_bounds
    }

    /// BSDF of the surface hit by `its`.
    pub fn surface_bsdf(&self, its: &Intersection) -> &dyn BSDF {
        self.bsdf(self.object(its.mesh).bsdf)
    }

    /// Emitter attached to the surface hit by `its`, if any.
    pub fn surface_emitter(&self, its: &Intersection) -> Option<EmitterId> {
        self.object(its.mesh).emitter
    }

    /// Closest hit along the ray. Brute force over all faces, with a
    /// per-mesh bounding box reject.
    pub fn ray_intersect(&self, ray: &Ray3f) -> Option<Intersection> {
        let mut closest: Option<(usize, usize, Float, Float)> = None;
        let mut search = *ray;

        for (mesh_idx, object) in self.objects.iter().enumerate() {
            if object.mesh.bounding_box().ray_intersect(&search).is_none() {
                continue;
            }
            for face in 0..object.mesh.face_count() {
                if let Some((u, v, t)) = object.mesh.ray_intersect(face, &search) {
                    search = search.with_max_t(t);
                    closest = Some((mesh_idx, face, u, v));
                }
            }
        }

        let (mesh_idx, face, u, v) = closest?;
        let object = &self.objects[mesh_idx];
        let point = object.mesh.surface_point(face, u, v);

        Some(Intersection {
            p: point.p,
            t: search.max_t,
            uv: point.uv,
            sh_frame: Frame::from_normal(&point.sh_normal),
            geo_frame: Frame::from_normal(&point.geo_normal),
            mesh: MeshId(mesh_idx),
            face,
            medium: object.medium,
        })
    }

    /// Any-hit query for shadow rays.
    pub fn ray_occluded(&self, ray: &Ray3f) -> bool {
        self.objects.iter().any(|object| {
            object.mesh.bounding_box().ray_intersect(ray).is_some()
                && (0..object.mesh.face_count()).any(|face| object.mesh.ray_intersect(face, ray).is_some())
        })
    }

    /// Picks an emitter uniformly. Returns it with its selection probability.
    pub fn sample_emitter(&self, u: Float) -> Option<(EmitterId, Float)> {
        if self.emitters.is_empty() {
            return None;
        }
        let count = self.emitters.len();
        let idx = ((u * count as Float) as usize).min(count - 1);
        Some((EmitterId(idx), 1.0 / count as Float))
    }

    /// Discrete probability that `sample_emitter` picks `id`.
    pub fn pdf_emitter(&self, id: EmitterId) -> Float {
        if id.0 < self.emitters.len() {
            1.0 / self.emitters.len() as Float
        } else {
            0.0
        }
    }

    /// Radiance arriving along a ray that leaves the scene.
    pub fn background(&self, ray: &Ray3f) -> RGBSpectrum {
        match self.environment {
            Some(id) => {
                let rec = EmitterQueryRecord::from_direction(ray.origin(), ray.dir());
                self.emitter(id).eval(&rec)
            }
            None => self.background,
        }
    }
}

struct PendingObject {
    mesh: Mesh,
    bsdf: Option<Box<dyn BSDF>>,
    emitter: Option<Box<dyn Emitter>>,
    medium: Option<Box<dyn Medium>>,
}

/// Collects meshes and their attachments, then resolves them into a
/// `Scene` in `activate`.
#[derive(Default)]
pub struct SceneBuilder {
    objects: Vec<PendingObject>,
    environment: Option<Box<dyn Emitter>>,
    background: RGBSpectrum,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.objects.push(PendingObject { mesh, bsdf: None, emitter: None, medium: None });
        MeshId(self.objects.len() - 1)
    }

    /// Attaches a BSDF, an emitter or a medium to a mesh.
    pub fn add_child(&mut self, mesh: MeshId, child: SceneNode) -> Result<()> {
        let object = self.objects.get_mut(mesh.0).ok_or_else(|| {
            RenderError::Configuration(format!("Mesh #{} does not exist", mesh.0))
        })?;
        let mesh_name = object.mesh.name().to_string();

        match child {
            SceneNode::BSDF(bsdf) => {
                if object.bsdf.is_some() {
                    return Err(RenderError::Configuration(format!(
                        "Mesh \"{}\": tried to register multiple BSDF instances", mesh_name)));
                }
                object.bsdf = Some(bsdf);
            }
            SceneNode::Emitter(emitter) => {
                if object.emitter.is_some() {
                    return Err(RenderError::Configuration(format!(
                        "Mesh \"{}\": tried to register multiple emitters", mesh_name)));
                }
                object.emitter = Some(emitter);
            }
            SceneNode::Medium(medium) => {
                if object.medium.is_some() {
                    return Err(RenderError::Configuration(format!(
                        "Mesh \"{}\": tried to register multiple media", mesh_name)));
                }
                object.medium = Some(medium);
            }
            other => {
                return Err(RenderError::Configuration(format!(
                    "Mesh \"{}\": a {} cannot be attached to a mesh", mesh_name, other.class_name())));
            }
        }
        Ok(())
    }

    pub fn add_environment(&mut self, emitter: Box<dyn Emitter>) -> Result<()> {
        if self.environment.is_some() {
            return Err(RenderError::Configuration(String::from(
                "Tried to register multiple environment emitters")));
        }
        self.environment = Some(emitter);
        Ok(())
    }

    pub fn set_background(&mut self, background: RGBSpectrum) {
        self.background = background;
    }

    /// Validates attachments, fills in default BSDFs and media children and
    /// builds the sampling tables.
    pub fn activate(self, registry: &Registry) -> Result<Scene> {
        let mut scene = Scene {
            objects: Vec::with_capacity(self.objects.len()),
            bsdfs: Vec::new(),
            emitters: Vec::new(),
            media: Vec::new(),
            environment: None,
            background: self.background,
            scene_bounds: AABB::default(),
        };

        for (idx, pending) in self.objects.into_iter().enumerate() {
            let PendingObject { mut mesh, bsdf, emitter, medium } = pending;
            mesh.activate()?;
            scene.scene_bounds.expand_by_aabb(&mesh.bounding_box());

            let bsdf = match bsdf {
                Some(bsdf) => bsdf,
                None => registry.create_bsdf("diffuse", &PropertyList::new())?,
            };
            scene.bsdfs.push(bsdf);
            let bsdf_id = BsdfId(scene.bsdfs.len() - 1);

            let emitter_id = match emitter {
                Some(mut emitter) => {
                    if mesh.total_area() <= 0.0 {
                        return Err(RenderError::Configuration(format!(
                            "Mesh \"{}\": an emitting mesh needs a positive surface area", mesh.name())));
                    }
                    emitter.set_parent(MeshId(idx))?;
                    scene.emitters.push(emitter);
                    Some(EmitterId(scene.emitters.len() - 1))
                }
                None => None,
            };

            let medium_id = match medium {
                Some(mut medium) => {
                    medium.activate(registry)?;
                    scene.media.push(medium);
                    Some(MediumId(scene.media.len() - 1))
                }
                None => None,
            };

            scene.objects.push(SceneObject { mesh, bsdf: bsdf_id, emitter: emitter_id, medium: medium_id });
        }

        if let Some(environment) = self.environment {
            if !environment.is_environment() {
                return Err(RenderError::Configuration(format!(
                    "{} was registered as an environment but needs a mesh", environment.to_string())));
            }
            scene.emitters.push(environment);
            scene.environment = Some(EmitterId(scene.emitters.len() - 1));
        }

        for emitter in scene.emitters.iter() {
            emitter.activate()?;
        }

        log::info!("Scene activated: {} meshes, {} emitters, {} media",
                   scene.objects.len(), scene.emitters.len(), scene.media.len());
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::phase::PhaseFunction;
    use crate::emitters::area::AreaEmitter;
    use crate::emitters::environment::EnvironmentEmitter;
    use crate::materials::mirror::Mirror;
    use crate::math::constants::Vector3f;
    use crate::phase_functions::isotropic::Isotropic;

    fn quad(z: Float) -> Mesh {
        Mesh::rectangle("quad",
                        Vector3f::new(0.0, 0.0, z),
                        Vector3f::new(1.0, 0.0, 0.0),
                        Vector3f::new(0.0, 1.0, 0.0))
    }

    fn down_ray() -> Ray3f {
        Ray3f::new(Vector3f::new(0.1, 0.2, 10.0), Vector3f::new(0.0, 0.0, -1.0), None, None)
    }

    #[test]
    fn test_closest_hit_and_defaults() {
        let registry = Registry::with_defaults();
        let mut builder = SceneBuilder::new();
        builder.add_mesh(quad(5.0));
        let near = builder.add_mesh(quad(8.0));
        builder.add_mesh(quad(0.0));
        let scene = builder.activate(&registry).unwrap();

        let its = scene.ray_intersect(&down_ray()).expect("expected intersection");
        assert_eq!(its.mesh, near);
        assert!((its.t - 2.0).abs() < 1e-5);
        assert!((its.p - Vector3f::new(0.1, 0.2, 8.0)).norm() < 1e-5);
        assert!(its.medium.is_none());
        assert!(scene.surface_bsdf(&its).is_diffuse());
        assert!(scene.ray_occluded(&down_ray()));
        assert!(!scene.ray_occluded(&down_ray().with_max_t(1.0)));
    }

    #[test]
    fn test_attachments_and_emitter_selection() {
        let registry = Registry::with_defaults();
        let mut builder = SceneBuilder::new();
        let light = builder.add_mesh(quad(1.0));
        let mirror = builder.add_mesh(quad(0.0));
        builder.add_child(light, SceneNode::Emitter(Box::new(AreaEmitter::new(RGBSpectrum::one())))).unwrap();
        builder.add_child(mirror, SceneNode::BSDF(Box::new(Mirror::new()))).unwrap();
        builder.add_environment(Box::new(EnvironmentEmitter::new(RGBSpectrum::splat(0.5)))).unwrap();
        let scene = builder.activate(&registry).unwrap();

        assert_eq!(scene.emitter_count(), 2);
        assert_eq!(scene.object(light).emitter, Some(EmitterId(0)));
        assert_eq!(scene.environment(), Some(EmitterId(1)));
        assert_eq!(scene.emitter(EmitterId(0)).parent(), Some(light));
        assert!(!scene.bsdf(scene.object(mirror).bsdf).is_diffuse());

        assert_eq!(scene.sample_emitter(0.2), Some((EmitterId(0), 0.5)));
        assert_eq!(scene.sample_emitter(0.99), Some((EmitterId(1), 0.5)));
        assert_eq!(scene.pdf_emitter(EmitterId(1)), 0.5);
        assert_eq!(scene.pdf_emitter(EmitterId(7)), 0.0);

        let up = Ray3f::new(Vector3f::new(5.0, 5.0, 5.0), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert_eq!(scene.background(&up), RGBSpectrum::splat(0.5));
    }

    #[test]
    fn test_duplicate_and_misplaced_children() {
        let mut builder = SceneBuilder::new();
        let mesh = builder.add_mesh(quad(0.0));
        builder.add_child(mesh, SceneNode::BSDF(Box::new(Mirror::new()))).unwrap();

        let duplicate = builder.add_child(mesh, SceneNode::BSDF(Box::new(Mirror::new())));
        assert!(matches!(duplicate, Err(RenderError::Configuration(_))));

        let phase: Box<dyn PhaseFunction> = Box::new(Isotropic::new());
        let misplaced = builder.add_child(mesh, SceneNode::PhaseFunction(phase));
        assert!(matches!(misplaced, Err(RenderError::Configuration(_))));

        let missing = builder.add_child(MeshId(4), SceneNode::BSDF(Box::new(Mirror::new())));
        assert!(missing.is_err());
    }

    #[test]
    fn test_area_light_without_mesh_is_rejected() {
        let mut builder = SceneBuilder::new();
        builder.add_environment(Box::new(AreaEmitter::new(RGBSpectrum::one()))).unwrap();
        let result = builder.activate(&Registry::with_defaults());
        assert!(matches!(result, Err(RenderError::Configuration(_))));
    }

    #[test]
    fn test_empty_scene_has_no_emitters() {
        let scene = SceneBuilder::new().activate(&Registry::with_defaults()).unwrap();
        assert!(scene.sample_emitter(0.5).is_none());
        assert!(scene.ray_intersect(&down_ray()).is_none());
        assert!(scene.background(&down_ray()).is_black());
    }
}
