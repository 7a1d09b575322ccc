// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Handling of the local profile directory, where the common reference
//! string and the compiled circuit keys are cached.
//!
//! The profile lives in `$BIAS_PROFILE_PATH/.bias` (defaulting to the home
//! directory) and keys in `$BIAS_KEYS_PATH/keys` (defaulting to the
//! profile).

mod theme;

pub use theme::Theme;

use dirs::home_dir;
use sha2::{Digest, Sha256};
use std::env;
use std::fs::{self, read, read_to_string, remove_file, write, File};
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CRS_FNAME: &str = "bias.crs";
const CRS_DIGEST_FNAME: &str = "bias.crs.sha256";

/// Keys of a circuit, fetched lazily from the keys directory.
#[derive(Debug, Clone)]
pub struct Keys {
    dir: PathBuf,
    id: [u8; 32],
}

impl Keys {
    pub fn id(&self) -> &[u8; 32] {
        &self.id
    }

    pub fn get_prover(&self) -> Result<Vec<u8>, io::Error> {
        self.get("pk", "ProverKey not found")
    }

    pub fn get_verifier(&self) -> Result<Vec<u8>, io::Error> {
        self.get("vd", "VerifierData not found")
    }

    fn get(&self, ext: &str, missing: &str) -> Result<Vec<u8>, io::Error> {
        let file = self.dir.join(hex::encode(self.id)).with_extension(ext);

        match &file.exists() {
            true => read(file),
            false => Err(io::Error::new(io::ErrorKind::NotFound, missing)),
        }
    }
}

fn extension(p: &Path) -> Option<&str> {
    p.extension()?.to_str()
}

fn file_stem(p: &Path) -> Option<&str> {
    p.file_stem()?.to_str()
}

pub fn get_bias_profile_dir() -> Result<PathBuf, io::Error> {
    env::var("BIAS_PROFILE_PATH")
        .map_or(home_dir(), |e| Some(PathBuf::from(e)))
        .and_then(|mut p| {
            p.push(".bias");
            fs::create_dir_all(&p).map(|_| p).ok()
        })
        .ok_or_else(|| {
            warn!("bias-profile dir not found and impossible to create");
            io::Error::new(
                io::ErrorKind::NotFound,
                "User Profile Dir not found",
            )
        })
}

pub fn get_bias_keys_dir() -> Result<PathBuf, io::Error> {
    env::var("BIAS_KEYS_PATH")
        .map_or_else(
            |_| get_bias_profile_dir().ok(),
            |e| Some(PathBuf::from(e)),
        )
        .and_then(|mut p| {
            p.push("keys");
            fs::create_dir_all(&p).map(|_| p).ok()
        })
        .ok_or_else(|| {
            warn!("bias-profile key's dir not found and impossible to create");
            io::Error::new(io::ErrorKind::NotFound, "Keys Dir not found")
        })
}

/// A profile directory together with its keys directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    dir: PathBuf,
    keys_dir: PathBuf,
}

impl Profile {
    /// Resolves the profile from the environment, creating the directories
    /// if missing.
    pub fn from_env() -> Result<Self, io::Error> {
        Ok(Self {
            dir: get_bias_profile_dir()?,
            keys_dir: get_bias_keys_dir()?,
        })
    }

    /// Uses `root` as the profile directory, with keys in `root/keys`.
    pub fn at<P: AsRef<Path>>(root: P) -> Result<Self, io::Error> {
        let dir = root.as_ref().to_path_buf();
        let keys_dir = dir.join("keys");
        fs::create_dir_all(&keys_dir)?;

        Ok(Self { dir, keys_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn keys_dir(&self) -> &Path {
        &self.keys_dir
    }

    pub fn get_common_reference_string(&self) -> Result<Vec<u8>, io::Error> {
        read(self.dir.join(CRS_FNAME))
    }

    /// Stores the CRS along with its SHA-256 digest.
    pub fn set_common_reference_string(
        &self,
        buffer: Vec<u8>,
    ) -> Result<(), io::Error> {
        write(self.dir.join(CRS_DIGEST_FNAME), sha256_hex(&buffer))?;
        write(self.dir.join(CRS_FNAME), buffer)?;
        info!("CRS added to cache");

        Ok(())
    }

    pub fn delete_common_reference_string(&self) -> Result<(), io::Error> {
        remove_file(self.dir.join(CRS_FNAME))?;
        let digest = self.dir.join(CRS_DIGEST_FNAME);
        if digest.exists() {
            remove_file(digest)?;
        }
        info!("CRS removed from cache");

        Ok(())
    }

    /// Checks `buff` against the digest stored when the CRS was cached.
    ///
    /// A missing or unreadable digest fails the check.
    pub fn verify_common_reference_string(&self, buff: &[u8]) -> bool {
        info!("Checking integrity of CRS");
        match read_to_string(self.dir.join(CRS_DIGEST_FNAME)) {
            Ok(stored) => stored.trim() == sha256_hex(buff),
            Err(_) => false,
        }
    }

    /// Removes every file of the keys directory that is not the key of one
    /// of the given circuits.
    pub fn clean_outdated_keys(
        &self,
        ids: &[[u8; 32]],
    ) -> Result<(), io::Error> {
        info!("Cleaning outdated keys (if any)");
        let ids_as_string: Vec<_> = ids.iter().map(hex::encode).collect();

        fs::read_dir(&self.keys_dir)?
            .map(|res| res.map(|e| e.path()))
            .filter_map(|res| res.ok())
            .filter(|e| e.is_file())
            .filter(|p| match extension(p) {
                Some("pk" | "vd") => file_stem(p)
                    .filter(|id| !ids_as_string.iter().any(|s| s == id))
                    .is_some(),
                _ => true,
            })
            .try_for_each(|p| {
                info!("Found outdated file {:?}", &p);
                remove_file(&p)?;
                info!("{:?} was successfully removed", &p);
                Ok(())
            })
    }

    pub fn keys_for(&self, id: &[u8; 32]) -> Keys {
        Keys {
            dir: self.keys_dir.clone(),
            id: *id,
        }
    }

    pub fn add_keys_for(
        &self,
        id: &[u8; 32],
        pk: Vec<u8>,
        vd: Vec<u8>,
    ) -> Result<(), io::Error> {
        let file = self.keys_dir.join(hex::encode(id));

        let pk_file = file.with_extension("pk");
        let vd_file = file.with_extension("vd");

        File::create(&pk_file)?.write_all(&pk)?;
        info!("Entry added: {:?}", pk_file);

        File::create(&vd_file)?.write_all(&vd)?;
        info!("Entry added: {:?}", vd_file);

        Ok(())
    }

    pub fn clear_all_keys(&self) -> Result<(), io::Error> {
        info!("Clearing all the keys directory");
        fs::read_dir(&self.keys_dir)?
            .map(|res| res.map(|e| e.path()))
            .filter_map(|res| res.ok())
            .filter(|p| p.is_file())
            .try_for_each(remove_file)
    }
}

fn sha256_hex(buff: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(buff);
    format!("{:x}", hasher.finalize())
}
