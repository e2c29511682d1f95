// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod error;

use std::collections::BTreeSet;

use time::macros::datetime;

use crate::{
    Commune, FormType, Office, Origin, Priority, Report, ReportState, Territory,
};

pub const DDFIP_64: i64 = 10;
pub const DDFIP_40: i64 = 11;

pub fn create_test_territory() -> Territory {
    let mut territory = Territory::new();
    territory.add_commune(Commune {
        code_insee: String::from("64102"),
        name: String::from("Bayonne"),
        code_departement: String::from("64"),
        siren_epci: Some(String::from("200067106")),
    });
    territory.add_commune(Commune {
        code_insee: String::from("64445"),
        name: String::from("Pau"),
        code_departement: String::from("64"),
        siren_epci: Some(String::from("200067254")),
    });
    territory.add_commune(Commune {
        code_insee: String::from("40192"),
        name: String::from("Mont-de-Marsan"),
        code_departement: String::from("40"),
        siren_epci: None,
    });
    territory.add_ddfip("64", DDFIP_64);
    territory.add_ddfip("40", DDFIP_40);
    territory
}

pub fn create_test_report(commune: &str, form_type: FormType) -> Report {
    Report {
        report_id: 1,
        reference: String::from("2026-01-0001"),
        origin: Origin::WebUi,
        collectivity_id: 100,
        publisher_id: None,
        sandbox: false,
        commune: commune.to_string(),
        form_type,
        priority: Priority::Medium,
        note: None,
        state: ReportState::Draft,
        ddfip_id: None,
        office_id: None,
        package_reference: None,
        resolution_motif: None,
        reponse: None,
        rejection_reason: None,
        created_at: datetime!(2026-01-05 09:00 UTC),
        ready_at: None,
        transmitted_at: None,
        accepted_at: None,
        assigned_at: None,
        resolved_at: None,
        approved_at: None,
        canceled_at: None,
        rejected_at: None,
        discarded_at: None,
        lock_version: 0,
    }
}

pub fn create_test_office(office_id: i64, ddfip_id: i64, competences: &[FormType]) -> Office {
    Office {
        office_id,
        ddfip_id,
        name: format!("Office {office_id}"),
        competences: competences.iter().copied().collect(),
        communes: BTreeSet::new(),
        epcis: BTreeSet::new(),
        departements: BTreeSet::new(),
        member_ids: BTreeSet::new(),
    }
}
