// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use signalements_audit::{Actor, Cause};
use signalements_domain::{
    Commune, FormType, NewReport, Office, Origin, PackageProvenance, Priority, Report, Territory,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{Command, TransitionOutcome, apply, apply_create};

pub const DDFIP_64: i64 = 10;
pub const NOW: OffsetDateTime = datetime!(2026-02-03 10:00 UTC);

pub fn create_test_actor() -> Actor {
    Actor::user(7, 100)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn create_test_territory() -> Territory {
    let mut territory: Territory = Territory::new();
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
        siren_epci: None,
    });
    territory.add_commune(Commune {
        code_insee: String::from("2A004"),
        name: String::from("Ajaccio"),
        code_departement: String::from("2A"),
        siren_epci: None,
    });
    territory.add_ddfip("64", DDFIP_64);
    territory
}

pub fn create_test_new_report() -> NewReport {
    NewReport {
        origin: Origin::WebUi,
        collectivity_id: 100,
        publisher_id: None,
        sandbox: false,
        commune: String::from("64102"),
        form_type: FormType::ValuationHabitation,
        priority: Priority::Medium,
        note: Some(String::from("Piscine non declaree")),
    }
}

pub fn create_test_office() -> Office {
    Office {
        office_id: 5,
        ddfip_id: DDFIP_64,
        name: String::from("SIP Bayonne"),
        competences: BTreeSet::from([FormType::ValuationHabitation]),
        communes: BTreeSet::new(),
        epcis: BTreeSet::from([String::from("200067106")]),
        departements: BTreeSet::new(),
        member_ids: BTreeSet::new(),
    }
}

pub fn create_test_provenance(sandbox: bool) -> PackageProvenance {
    PackageProvenance {
        reference: String::from("2026-02-0001"),
        origin: Origin::WebUi,
        sandbox,
        transmitted_at: NOW,
    }
}

/// Creates a stored draft report.
pub fn create_draft_report() -> Report {
    let mut report: Report = apply_create(
        &create_test_territory(),
        create_test_new_report(),
        String::from("2026-02-0001"),
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap()
    .report;
    report.report_id = 1;
    report
}

/// Applies a command that must change the report.
pub fn apply_ok(report: &Report, command: Command) -> Report {
    match apply(
        &create_test_territory(),
        report,
        command,
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap()
    {
        TransitionOutcome::Applied(result) => result.new_report,
        TransitionOutcome::Unchanged => panic!("expected the command to change the report"),
    }
}

/// Walks a fresh report up to `assigned`.
pub fn create_assigned_report() -> Report {
    let report: Report = apply_ok(&create_draft_report(), Command::MarkReady);
    let report: Report = apply_ok(
        &report,
        Command::Transmit {
            provenance: create_test_provenance(false),
        },
    );
    let report: Report = apply_ok(&report, Command::Accept);
    apply_ok(
        &report,
        Command::Assign {
            office: create_test_office(),
        },
    )
}
