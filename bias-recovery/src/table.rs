// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fs;
use std::path::Path;

use bias_core::interchange::TableRecord;
use bias_core::stats::{self, TARGET};
use bias_core::table::{KNOTS, SEGMENTS};
use bias_core::{CoefficientTable, CANONICAL};
use tracing::{debug, info, warn};

use crate::{Error, Theme};

/// File name of the exported table.
pub const TABLE_FILE: &str = "bias_table.json";

/// Upper bound of the samples covered by the approximation error report.
const ERROR_REPORT_LIMIT: u32 = 9000;

/// Validates `table` and logs its distribution against Beta(2,5).
pub fn check(table: &CoefficientTable) -> Result<(), Error> {
    let theme = Theme::default();

    table.validate()?;
    info!(
        "{} table v{} with {} segments",
        theme.success("Validated"),
        table.version,
        SEGMENTS
    );

    let magnitudes = table.max_magnitude();
    for (segment, magnitude) in magnitudes.iter().enumerate() {
        debug!("segment {segment} peaks at {magnitude:?}");
    }

    let moments = stats::exhaustive(table)?.moments();
    if let Some(moments) = moments {
        info!("{} {moments}", theme.info("Exhaustive"));
        info!("{} {TARGET}", theme.info("Target"));
    }

    let error = stats::max_abs_error(table, ERROR_REPORT_LIMIT)?;
    info!(
        "{} max |T(u) - Q(u)| = {error:.2} below {ERROR_REPORT_LIMIT}",
        theme.info("Error")
    );

    Ok(())
}

/// Reads a table record from `path` and compiles it.
pub fn load(path: &Path) -> Result<CoefficientTable, Error> {
    let record: TableRecord = serde_json::from_slice(&fs::read(path)?)?;
    Ok(record.to_table()?)
}

/// Checks the canonical table, or the record at `input`, and writes the
/// checked table into `output` if given.
pub fn exec(
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Error> {
    let theme = Theme::default();

    let table = match input {
        Some(path) => {
            info!("{} {}", theme.action("Loading"), path.display());
            let table = load(path)?;
            if table != CANONICAL {
                warn!("{} differs from the compiled one", theme.warn("Table"));
            }
            table
        }
        None => CANONICAL,
    };
    check(&table)?;

    if stats::compile_linear(&KNOTS)? == CANONICAL {
        info!("{} coefficients from the quantile", theme.success("Reproduced"));
    } else {
        warn!("{} coefficients from the quantile", theme.warn("Diverging"));
    }

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
        let file = dir.join(TABLE_FILE);

        let record = TableRecord::from(&table);
        fs::write(&file, serde_json::to_string_pretty(&record)?)?;
        info!("{} {}", theme.success("Written"), file.display());
    }

    Ok(())
}
