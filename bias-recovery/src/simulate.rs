// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use bias_core::stats::{Moments, Summary, Tolerance, TARGET};
use bias_core::BlsScalar;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::{prelude::*, ThreadPoolBuilder};
use tracing::info;

use crate::config::SimulationConfig;
use crate::{Error, Theme};

fn random_scalar<R: RngCore>(rng: &mut R) -> BlsScalar {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    BlsScalar::from_bytes_wide(&bytes)
}

/// Draws `samples` random `(nullifier, secret)` pairs and accumulates their
/// biases.
fn worker(seed: u64, samples: u32) -> Result<Summary, bias_core::Error> {
    let rng = &mut StdRng::seed_from_u64(seed);
    let mut summary = Summary::default();

    for _ in 0..samples {
        let nullifier = random_scalar(rng);
        let secret = random_scalar(rng);
        summary.push(bias_core::bias(&nullifier, &secret)?.bias());
    }

    Ok(summary)
}

/// Samples the bias distribution across `config.threads` workers.
///
/// Worker `i` is seeded with `config.seed + i`, so the result only depends on
/// the configuration.
pub fn run(config: &SimulationConfig) -> Result<Summary, Error> {
    let threads = config.threads.clamp(1, config.samples.max(1) as usize);
    let threads_u32 = u32::try_from(threads).unwrap_or(u32::MAX);
    let share = config.samples / threads_u32;
    let extra = config.samples % threads_u32;

    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
    pool.install(|| {
        (0..threads_u32)
            .into_par_iter()
            .map(|i| {
                let samples = share + u32::from(i < extra);
                worker(config.seed.wrapping_add(u64::from(i)), samples)
            })
            .try_reduce(Summary::default, |mut acc, summary| {
                acc.merge(&summary);
                Ok(acc)
            })
            .map_err(Error::from)
    })
}

/// Runs the simulation and checks the moments against Beta(2,5).
pub fn exec(config: &SimulationConfig) -> Result<Moments, Error> {
    let theme = Theme::default();
    info!(
        "{} {} samples on {} threads",
        theme.action("Simulating"),
        config.samples,
        config.threads
    );

    let summary = run(config)?;
    let moments = summary.moments().ok_or(Error::NoSamples)?;

    info!("{} {moments}", theme.info("Observed"));
    info!("{} {TARGET}", theme.info("Target"));
    if let Some((min, max)) = summary.range() {
        info!("{} [{min}, {max}]", theme.info("Range"));
    }

    Tolerance::from(config.tolerance).check(&moments, &TARGET)?;
    info!("{} distribution within tolerance", theme.success("Matched"));

    Ok(moments)
}
