// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::math::spectrum::RGBSpectrum;

pub mod depth;
pub mod direct_ems;
pub mod direct_mats;
pub mod direct_mis;
pub mod lighting;
pub mod path;
pub mod path_media;
pub mod path_mis;
pub mod path_nee;

#[cfg(test)]
pub(crate) mod test_scenes;

/// Termination controls shared by the path estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSettings {
    /// Maximum number of scattering events, `None` for unbounded.
    pub max_depth: Option<usize>,
    pub russian_roulette: bool,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self { max_depth: None, russian_roulette: true }
    }
}

impl PathSettings {
    /// Reads `max_depth` (negative means unbounded) and `russian_roulette`.
    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        let max_depth = props.get_integer("max_depth", -1)?;
        let settings = Self {
            max_depth: if max_depth < 0 { None } else { Some(max_depth as usize) },
            russian_roulette: props.get_boolean("russian_roulette", true)?,
        };
        if settings.max_depth.is_none() && !settings.russian_roulette {
            return Err(RenderError::Configuration(String::from(
                "Disabling russian roulette requires a finite max_depth")));
        }
        Ok(settings)
    }

    pub fn depth_reached(&self, bounces: usize) -> bool {
        self.max_depth.map_or(false, |max| bounces >= max)
    }

    /// Throughput roulette after the second bounce. Survivors are divided by
    /// their survival probability; returns false when the path dies.
    pub fn survives(&self, bounces: usize, sampler: &mut dyn Sampler, throughput: &mut RGBSpectrum) -> bool {
        if !self.russian_roulette || bounces < 2 {
            return true;
        }
        let q = throughput.max_coeff().min(0.95);
        if q <= 0.0 || sampler.next_1d() >= q {
            return false;
        }
        *throughput /= q;
        true
    }

    pub fn describe(&self) -> String {
        match self.max_depth {
            Some(depth) => format!("maxDepth = {}, russianRoulette = {}", depth, self.russian_roulette),
            None => format!("maxDepth = inf, russianRoulette = {}", self.russian_roulette),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::IndependentSampler;

    #[test]
    fn test_settings_from_properties() {
        let defaults = PathSettings::from_properties(&PropertyList::new()).unwrap();
        assert_eq!(defaults, PathSettings::default());
        assert!(!defaults.depth_reached(1000));

        let bounded = PathSettings::from_properties(&PropertyList::new()
            .with("max_depth", 3i64)
            .with("russian_roulette", false)).unwrap();
        assert!(!bounded.depth_reached(2));
        assert!(bounded.depth_reached(3));

        let endless = PathSettings::from_properties(&PropertyList::new().with("russian_roulette", false));
        assert!(matches!(endless, Err(RenderError::Configuration(_))));
    }

    #[test]
    fn test_roulette_keeps_expectation() {
        let settings = PathSettings::default();
        let mut sampler = IndependentSampler::new(77);
        let n = 100_000;
        let mut total = 0.0f64;
        for _ in 0..n {
            let mut throughput = RGBSpectrum::new(0.3, 0.2, 0.1);
            assert!(settings.survives(1, &mut sampler, &mut throughput));
            if settings.survives(2, &mut sampler, &mut throughput) {
                assert!((throughput[0] - 1.0).abs() < 1e-5);
                total += throughput[1] as f64;
            }
        }
        assert!((total / n as f64 - 0.2).abs() < 0.01);
    }
}
