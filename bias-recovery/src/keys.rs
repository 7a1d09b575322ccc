// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use bias_circuits::{BiasCircuit, UniformCircuit, TRANSCRIPT_LABEL};
use bias_profile::Profile;
use dusk_plonk::prelude::*;
use once_cell::unsync::OnceCell;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::{Error, Theme};

/// Capacity of the cached CRS.
pub const CRS_CAPACITY: usize = 1 << 14;

const CRS_SEED: u64 = 0xbeef;

/// Loads the CRS from the profile, or builds and caches a new one if it is
/// missing or does not match its stored digest.
pub fn public_parameters(
    profile: &Profile,
) -> Result<PublicParameters, Error> {
    let theme = Theme::default();
    info!("{} CRS from cache", theme.action("Fetching"));

    match profile.get_common_reference_string() {
        Ok(buff) if profile.verify_common_reference_string(&buff) => {
            // SAFETY: the bytes were produced by `to_raw_var_bytes` and match
            // the digest stored along with them
            let pp = unsafe { PublicParameters::from_slice_unchecked(&buff) };
            info!("{} CRS", theme.info("Loaded"));
            Ok(pp)
        }

        _ => {
            warn!("{} new CRS due to cache miss", theme.warn("Building"));
            let mut rng = StdRng::seed_from_u64(CRS_SEED);

            let pp = PublicParameters::setup(CRS_CAPACITY, &mut rng)?;
            profile.set_common_reference_string(pp.to_raw_var_bytes())?;

            info!("{} CRS", theme.info("Cached"));
            Ok(pp)
        }
    }
}

pub trait CircuitLoader {
    fn circuit_id(&self) -> &[u8; 32];

    fn circuit_name(&self) -> &'static str;

    fn compile_circuit(
        &self,
        pp: &PublicParameters,
    ) -> Result<(Vec<u8>, Vec<u8>), Error>;
}

macro_rules! loader_impl {
    ($loader:ident, $circuit:ty, $circuit_name:expr) => {
        pub struct $loader;

        impl CircuitLoader for $loader {
            fn circuit_id(&self) -> &[u8; 32] {
                <$circuit>::circuit_id()
            }

            fn circuit_name(&self) -> &'static str {
                $circuit_name
            }

            fn compile_circuit(
                &self,
                pp: &PublicParameters,
            ) -> Result<(Vec<u8>, Vec<u8>), Error> {
                let (prover, verifier) =
                    Compiler::compile::<$circuit>(pp, TRANSCRIPT_LABEL)?;

                Ok((prover.to_bytes(), verifier.to_bytes()))
            }
        }
    };
}

loader_impl!(BiasCircuitLoader, BiasCircuit, "BiasCircuit");
loader_impl!(UniformCircuitLoader, UniformCircuit, "UniformCircuit");

/// Every circuit whose keys are tracked in the profile.
pub fn loaders() -> Vec<&'static dyn CircuitLoader> {
    vec![&BiasCircuitLoader, &UniformCircuitLoader]
}

fn clear_outdated_keys(
    profile: &Profile,
    loader_list: &[&dyn CircuitLoader],
) -> Result<(), Error> {
    let id_list: Vec<_> = loader_list
        .iter()
        .map(|loader| loader.circuit_id())
        .cloned()
        .collect();

    Ok(profile.clean_outdated_keys(&id_list)?)
}

/// Returns the cached keys of `loader`, compiling and caching them first if
/// they are missing.
///
/// The CRS is only loaded when a circuit has to be compiled.
fn cached_keys(
    profile: &Profile,
    pp: &OnceCell<PublicParameters>,
    loader: &dyn CircuitLoader,
) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let theme = Theme::default();
    info!(
        "{} {} key from cache",
        theme.action("Fetching"),
        loader.circuit_name()
    );

    let keys = profile.keys_for(loader.circuit_id());
    match (keys.get_prover(), keys.get_verifier()) {
        (Ok(pk), Ok(vd)) => {
            info!(
                "{}   {}",
                theme.info("Loaded"),
                hex::encode(loader.circuit_id())
            );
            Ok((pk, vd))
        }
        _ => {
            warn!("{} due to cache miss", theme.warn("Compiling"));

            let pp = pp.get_or_try_init(|| public_parameters(profile))?;
            let (pk, vd) = loader.compile_circuit(pp)?;
            profile.add_keys_for(
                loader.circuit_id(),
                pk.clone(),
                vd.clone(),
            )?;
            info!(
                "{}   {}",
                theme.info("Cached"),
                hex::encode(loader.circuit_id())
            );
            Ok((pk, vd))
        }
    }
}

pub fn run_circuit_keys_checks(
    profile: &Profile,
    keep_keys: bool,
    loader_list: &[&dyn CircuitLoader],
) -> Result<(), Error> {
    let theme = Theme::default();

    if !keep_keys {
        info!("{} untracked keys", theme.action("Cleaning"));
        clear_outdated_keys(profile, loader_list)?;
    } else {
        info!("{} untracked keys", theme.action("Keeping"));
    }

    let pp = OnceCell::new();
    loader_list
        .iter()
        .try_for_each(|loader| cached_keys(profile, &pp, *loader).map(|_| ()))
}

/// Ensures the keys of every circuit are cached in `profile`.
pub fn exec(profile: &Profile, keep_keys: bool) -> Result<(), Error> {
    run_circuit_keys_checks(profile, keep_keys, &loaders())
}

/// Prover and verifier of the uniform circuit, from the profile cache.
pub fn uniform_keys(profile: &Profile) -> Result<(Prover, Verifier), Error> {
    let (pk, vd) =
        cached_keys(profile, &OnceCell::new(), &UniformCircuitLoader)?;

    Ok((Prover::try_from_bytes(&pk)?, Verifier::try_from_bytes(&vd)?))
}
