// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Tasks of the `bias-recovery` tool: caching circuit keys, exporting the
//! coefficient table, generating test vectors and simulating the bias
//! distribution.

pub mod config;
mod error;
pub mod keys;
pub mod simulate;
pub mod table;
pub mod vectors;

pub use bias_profile::Theme;
pub use error::Error;
