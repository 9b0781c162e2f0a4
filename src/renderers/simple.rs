// Copyright @yucwang 2021

use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::sampler::{IndependentSampler, Sampler};
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

pub use super::renderer::Renderer;

/// Block-parallel renderer averaging `samples_per_pixel` estimates per
/// pixel. Each pixel owns its sampler, so the image does not depend on the
/// number of workers.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    samples_per_pixel: usize,
    seed: u64,
    block_size: usize,
}

struct Block {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    pixels: Vec<RGBSpectrum>,
    rejected: usize,
}

impl ComputationNode for SimpleRenderer {
    fn to_string(&self) -> String {
        format!("SimpleRenderer[integrator = {}, samplesPerPixel = {}, seed = {}]",
                self.integrator.to_string(), self.samples_per_pixel, self.seed)
    }
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene, sensor: &dyn Sensor) -> Bitmap {
        let (width, height) = sensor.resolution();
        let mut bitmap = Bitmap::new(width, height);
        if width == 0 || height == 0 {
            return bitmap;
        }
        let spp = self.samples_per_pixel.max(1);
        let inv_spp = 1.0 / (spp as Float);

        let block_size = self.block_size.max(1);
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();

        log::info!("Rendering {}x{} at {} spp with {}", width, height, spp, integrator_ref.to_string());
        log::debug!("Sensor: {}", sensor.describe());

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = AtomicUsize::new(0);
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<Block>();
        let mut rejected = 0usize;

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = &next_block;
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let x0 = (block_index % blocks_x) * block_size;
                        let y0 = (block_index / blocks_x) * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let mut block = Block {
                            x0, y0, x1, y1,
                            pixels: vec![RGBSpectrum::zero(); (x1 - x0) * (y1 - y0)],
                            rejected: 0,
                        };
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let mut sampler = IndependentSampler::for_pixel(self.seed, x, y);
                                let mut color = RGBSpectrum::zero();
                                for _sample in 0..spp {
                                    let jitter = sampler.next_2d();
                                    let pixel = Vector2f::new(x as Float + jitter.x, y as Float + jitter.y);
                                    let aperture = sampler.next_2d();
                                    let ray = sensor.sample_ray(&pixel, &aperture);
                                    let li = integrator_ref.li(scene, &mut sampler, &ray);
                                    if li.is_valid() {
                                        color += li;
                                    } else {
                                        block.rejected += 1;
                                    }
                                }
                                block.pixels[(x - x0) + (x1 - x0) * (y - y0)] = color * inv_spp;
                            }
                        }
                        if tx.send(block).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok(block) = rx.recv() {
                    for y in block.y0..block.y1 {
                        for x in block.x0..block.x1 {
                            bitmap[(x, y)] = block.pixels[(x - block.x0) + (block.x1 - block.x0) * (y - block.y0)];
                        }
                    }
                    rejected += block.rejected;
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        if rejected > 0 {
            log::warn!("Discarded {} samples with NaN, infinite or negative radiance", rejected);
        }
        bitmap
    }
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, samples_per_pixel: usize, seed: u64) -> Self {
        Self {
            integrator,
            samples_per_pixel,
            seed,
            block_size: 32,
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }
}
