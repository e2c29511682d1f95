// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes. Callers wrap multi-statement writes in a transaction.

pub mod audit;
pub mod offices;
pub mod packages;
pub mod reference_data;
pub mod reports;
