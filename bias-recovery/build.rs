// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

fn main() {
    // Commit hash, commit date and toolchain channel for `--version`
    rustc_tools_util::setup_version_info!();
}
