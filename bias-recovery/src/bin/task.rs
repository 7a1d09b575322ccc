// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::time::Instant;

use bias_profile::Profile;
use bias_recovery_tools::{Error, Theme};
use tracing::{error, info};
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::prelude::*;

pub fn run(
    task: impl FnOnce(&Profile) -> Result<(), Error>,
    profile: Profile,
    level: tracing::Level,
    verbose: u8,
) -> Result<(), Error> {
    let begin = Instant::now();

    if verbose > 0 {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .compact();

        tracing_subscriber::registry()
            .with(LevelFilter::from_level(level))
            .with(fmt_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .without_time()
            .with_target(false)
            .with_level(false)
            .compact()
            .with_filter(filter_fn(|meta| meta.target().starts_with("bias_")));

        tracing_subscriber::registry()
            .with(LevelFilter::from_level(level))
            .with(fmt_layer)
            .init();
    }

    let theme = Theme::default();
    info!(
        "{} {} as profile path",
        theme.action("Using"),
        profile.dir().display()
    );
    info!(
        "{} {} as keys path",
        theme.action("Using"),
        profile.keys_dir().display()
    );

    let result = task(&profile);
    if let Err(e) = &result {
        error!("{} {e}", theme.error("Error"));
    }

    info!(
        "{} task in {:.2}s",
        theme.action("Finished"),
        begin.elapsed().as_secs_f32()
    );
    result
}
