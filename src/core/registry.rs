// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::computation_node::{ComputationNode, SceneNode};
use crate::core::density::DensityFunction;
use crate::core::emitter::Emitter;
use crate::core::error::{RenderError, Result};
use crate::core::integrator::Integrator;
use crate::core::medium::Medium;
use crate::core::phase::PhaseFunction;
use crate::core::properties::PropertyList;

use crate::densities::constant::ConstantDensity;
use crate::densities::perlin::PerlinDensity;
use crate::emitters::area::AreaEmitter;
use crate::emitters::environment::EnvironmentEmitter;
use crate::integrators::depth::DepthIntegrator;
use crate::integrators::direct_ems::DirectEmsIntegrator;
use crate::integrators::direct_mats::DirectMatsIntegrator;
use crate::integrators::direct_mis::DirectMisIntegrator;
use crate::integrators::path::PathIntegrator;
use crate::integrators::path_media::PathMediaIntegrator;
use crate::integrators::path_mis::PathMisIntegrator;
use crate::integrators::path_nee::PathNeeIntegrator;
use crate::materials::lambertian_diffuse::LambertianDiffuse;
use crate::materials::mirror::Mirror;
use crate::materials::roughconductor::RoughConductor;
use crate::materials::roughdielectric::RoughDielectric;
use crate::materials::roughsubstrate::RoughSubstrate;
use crate::media::heterogeneous_medium::HeterogeneousMedium;
use crate::media::homogeneous_medium::HomogeneousMedium;
use crate::phase_functions::henyey_greenstein::HenyeyGreenstein;
use crate::phase_functions::isotropic::Isotropic;

use std::collections::HashMap;

pub type Constructor = fn(&PropertyList) -> Result<SceneNode>;

/// Maps plugin names to constructors. Filled once before any scene is
/// built and only read afterwards.
pub struct Registry {
    constructors: HashMap<String, Constructor>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { constructors: HashMap::new() }
    }

    /// Registry holding every plugin shipped with the crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("diffuse", |p| Ok(SceneNode::BSDF(Box::new(LambertianDiffuse::from_properties(p)?))));
        registry.register("mirror", |p| Ok(SceneNode::BSDF(Box::new(Mirror::from_properties(p)?))));
        registry.register("roughconductor", |p| Ok(SceneNode::BSDF(Box::new(RoughConductor::from_properties(p)?))));
        registry.register("roughdielectric", |p| Ok(SceneNode::BSDF(Box::new(RoughDielectric::from_properties(p)?))));
        registry.register("roughsubstrate", |p| Ok(SceneNode::BSDF(Box::new(RoughSubstrate::from_properties(p)?))));

        registry.register("area", |p| Ok(SceneNode::Emitter(Box::new(AreaEmitter::from_properties(p)?))));
        registry.register("environment", |p| Ok(SceneNode::Emitter(Box::new(EnvironmentEmitter::from_properties(p)?))));

        registry.register("homogeneous", |p| Ok(SceneNode::Medium(Box::new(HomogeneousMedium::from_properties(p)?))));
        registry.register("heterogeneous", |p| Ok(SceneNode::Medium(Box::new(HeterogeneousMedium::from_properties(p)?))));

        registry.register("isotropic", |p| Ok(SceneNode::PhaseFunction(Box::new(Isotropic::from_properties(p)?))));
        registry.register("henyey_greenstein", |p| Ok(SceneNode::PhaseFunction(Box::new(HenyeyGreenstein::from_properties(p)?))));

        registry.register("constant", |p| Ok(SceneNode::Density(Box::new(ConstantDensity::from_properties(p)?))));
        registry.register("perlin", |p| Ok(SceneNode::Density(Box::new(PerlinDensity::from_properties(p)?))));

        registry.register("depth", |p| Ok(SceneNode::Integrator(Box::new(DepthIntegrator::from_properties(p)?))));
        registry.register("direct_ems", |p| Ok(SceneNode::Integrator(Box::new(DirectEmsIntegrator::from_properties(p)?))));
        registry.register("direct_mats", |p| Ok(SceneNode::Integrator(Box::new(DirectMatsIntegrator::from_properties(p)?))));
        registry.register("direct_mis", |p| Ok(SceneNode::Integrator(Box::new(DirectMisIntegrator::from_properties(p)?))));
        registry.register("path", |p| Ok(SceneNode::Integrator(Box::new(PathIntegrator::from_properties(p)?))));
        registry.register("path_nee", |p| Ok(SceneNode::Integrator(Box::new(PathNeeIntegrator::from_properties(p)?))));
        registry.register("path_mis", |p| Ok(SceneNode::Integrator(Box::new(PathMisIntegrator::from_properties(p)?))));
        registry.register("path_media", |p| Ok(SceneNode::Integrator(Box::new(PathMediaIntegrator::from_properties(p)?))));

        registry
    }

    /// Registers a constructor, replacing any previous one with that name.
    pub fn register(&mut self, name: &str, constructor: Constructor) {
        if self.constructors.insert(name.to_string(), constructor).is_some() {
            log::warn!("Plugin \"{}\" registered twice, keeping the latest", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn create(&self, name: &str, props: &PropertyList) -> Result<SceneNode> {
        let constructor = self.constructors.get(name).ok_or_else(|| {
            RenderError::Unsupported(format!("No plugin named \"{}\"", name))
        })?;
        let node = constructor(props)?;
        log::debug!("Created {}", node.to_string());
        Ok(node)
    }

    pub fn create_bsdf(&self, name: &str, props: &PropertyList) -> Result<Box<dyn BSDF>> {
        match self.create(name, props)? {
            SceneNode::BSDF(bsdf) => Ok(bsdf),
            other => Err(Self::wrong_role(name, "bsdf", &other)),
        }
    }

    pub fn create_emitter(&self, name: &str, props: &PropertyList) -> Result<Box<dyn Emitter>> {
        match self.create(name, props)? {
            SceneNode::Emitter(emitter) => Ok(emitter),
            other => Err(Self::wrong_role(name, "emitter", &other)),
        }
    }

    pub fn create_medium(&self, name: &str, props: &PropertyList) -> Result<Box<dyn Medium>> {
        match self.create(name, props)? {
            SceneNode::Medium(medium) => Ok(medium),
            other => Err(Self::wrong_role(name, "medium", &other)),
        }
    }

    pub fn create_phase_function(&self, name: &str, props: &PropertyList) -> Result<Box<dyn PhaseFunction>> {
        match self.create(name, props)? {
            SceneNode::PhaseFunction(phase) => Ok(phase),
            other => Err(Self::wrong_role(name, "phase function", &other)),
        }
    }

    pub fn create_density(&self, name: &str, props: &PropertyList) -> Result<Box<dyn DensityFunction>> {
        match self.create(name, props)? {
            SceneNode::Density(density) => Ok(density),
            other => Err(Self::wrong_role(name, "density function", &other)),
        }
    }

    pub fn create_integrator(&self, name: &str, props: &PropertyList) -> Result<Box<dyn Integrator>> {
        match self.create(name, props)? {
            SceneNode::Integrator(integrator) => Ok(integrator),
            other => Err(Self::wrong_role(name, "integrator", &other)),
        }
    }

    fn wrong_role(name: &str, expected: &str, node: &SceneNode) -> RenderError {
        RenderError::Unsupported(format!(
            "Plugin \"{}\" is a {}, not a {}", name, node.class_name(), expected))
    }
}
