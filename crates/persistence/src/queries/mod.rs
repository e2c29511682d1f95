// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.

pub mod audit;
pub mod offices;
pub mod organizations;
pub mod packages;
pub mod reports;
pub mod scope;
pub mod territory;
