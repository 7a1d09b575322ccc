// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use console::{Style, StyledObject};

/// Styles for the verbs prefixing every log line of the tools.
#[derive(Debug, Clone)]
pub struct Theme {
    action: Style,
    info: Style,
    success: Style,
    warn: Style,
    error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            action: Style::new().bold().cyan(),
            info: Style::new().bold().blue(),
            success: Style::new().bold().green(),
            warn: Style::new().bold().yellow(),
            error: Style::new().bold().red(),
        }
    }
}

impl Theme {
    pub fn action<'a>(&self, s: &'a str) -> StyledObject<&'a str> {
        self.action.apply_to(s)
    }

    pub fn info<'a>(&self, s: &'a str) -> StyledObject<&'a str> {
        self.info.apply_to(s)
    }

    pub fn success<'a>(&self, s: &'a str) -> StyledObject<&'a str> {
        self.success.apply_to(s)
    }

    pub fn warn<'a>(&self, s: &'a str) -> StyledObject<&'a str> {
        self.warn.apply_to(s)
    }

    pub fn error<'a>(&self, s: &'a str) -> StyledObject<&'a str> {
        self.error.apply_to(s)
    }
}
