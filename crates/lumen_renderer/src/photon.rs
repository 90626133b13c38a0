//! Photon emission.
//!
//! Photons leave the lights, are traced through the scene in
//! `RenderMode::PhotonMapping`, and are deposited where they land after at
//! least one specular or refractive bounce. The resulting map feeds the
//! caustics estimate.

use std::f32::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use lumen_core::PhotonDescription;
use rand::distributions::{Distribution, WeightedIndex};
use rayon::prelude::*;

use crate::integrator::{Integrator, PathContext, RenderMode};
use crate::photon_map::{Photon, PhotonMap};
use crate::sampling::unit_rng;
use crate::scene::Scene;

/// Photon emission settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotonSettings {
    /// Photons emitted in total (not the number stored).
    pub count: usize,
    /// Number of independent batches traced in parallel.
    pub batches: usize,
    pub seed: u64,
}

impl Default for PhotonSettings {
    fn default() -> Self {
        Self {
            count: 100_000,
            batches: 100,
            seed: 0,
        }
    }
}

impl PhotonSettings {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    /// Builder method to set the batch count.
    pub fn with_batches(mut self, batches: usize) -> Self {
        self.batches = batches;
        self
    }

    /// Builder method to set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_description(description: &PhotonDescription, seed: u64) -> Self {
        Self {
            count: description.count,
            batches: description.batches,
            seed,
        }
    }

    /// Photons emitted by batch `batch`; the remainder is spread over the
    /// first batches.
    fn batch_size(&self, batch: usize, batches: usize) -> usize {
        self.count / batches + usize::from(batch < self.count % batches)
    }
}

/// Emit photons from the scene's lights and build an optimized photon map.
///
/// Lights are picked with probability proportional to their power. Each
/// batch owns its generator and deposit buffer; buffers are merged into the
/// map after all batches finish, then the map is optimized once.
pub fn build_photon_map(scene: &Scene, settings: &PhotonSettings) -> PhotonMap {
    let mut photon_map = PhotonMap::new();
    let lights = scene.lights();

    if lights.is_empty() || settings.count == 0 {
        log::warn!("No light sources or photon budget in the scene, photon map is empty");
        photon_map.optimize();
        return photon_map;
    }

    let powers: Vec<f32> = lights.iter().map(|light| light.power()).collect();
    let light_choice = match WeightedIndex::new(&powers) {
        Ok(choice) => choice,
        Err(err) => {
            log::warn!("Cannot pick lights for photon emission ({}), photon map is empty", err);
            photon_map.optimize();
            return photon_map;
        }
    };

    let start = Instant::now();
    let batches = settings.batches.clamp(1, settings.count);
    // Every photon starts with an equal share of the total flux, spread over
    // the gather disk and the hemisphere.
    let importance = scene.total_flux() / settings.count as f32 / (Photon::gather_area() * 2.0 * PI);

    log::info!(
        "Emitting {} photons from {} lights in {} batches",
        settings.count,
        lights.len(),
        batches
    );

    let integrator = Integrator::new(scene);
    let finished = AtomicUsize::new(0);

    let deposits: Vec<Vec<Photon>> = (0..batches)
        .into_par_iter()
        .map(|batch| {
            let mut rng = unit_rng(settings.seed, batch as u64);
            let mut photons = Vec::new();

            for _ in 0..settings.batch_size(batch, batches) {
                let light = &lights[light_choice.sample(&mut rng)];
                let ray = light.emit_ray(&mut rng).with_importance(importance);
                let mut ctx = PathContext::with_photons(&mut rng, &mut photons);
                integrator.trace_ray(&ray, RenderMode::PhotonMapping, 0, &mut ctx);
            }

            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!(
                "Photon batch {} done ({}/{}), {} photons stored",
                batch,
                done,
                batches,
                photons.len()
            );
            photons
        })
        .collect();

    for photon in deposits.into_iter().flatten() {
        photon_map.insert(photon);
    }

    log::info!("Number of photons in scene: {}", photon_map.len());
    log::info!("Optimizing photon map");
    photon_map.optimize();

    log::info!("Photon map built in {:.2}s", start.elapsed().as_secs_f32());
    photon_map
}
