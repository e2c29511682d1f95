// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use signalements::{Command, CreationResult, TransitionOutcome, TransitionResult, apply, apply_create};
use signalements_audit::{Actor, Cause};
use signalements_domain::{
    Collectivity, CollectivityTerritory, Commune, Ddfip, Dgfip, FormType, NewReport, Office,
    Organization, Origin, Priority, Publisher, Report, Territory, User,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{Persistence, Seed};

pub const NOW: OffsetDateTime = datetime!(2026-03-10 08:30 UTC);

pub const PUBLISHER: i64 = 1;
pub const COLLECTIVITY: i64 = 2;
pub const OTHER_COLLECTIVITY: i64 = 3;
pub const DDFIP_64: i64 = 10;
pub const DDFIP_40: i64 = 11;
pub const DGFIP: i64 = 20;

pub const OFFICE_HABITATION: i64 = 1;
pub const OFFICE_PAU: i64 = 2;
pub const OFFICE_LANDES: i64 = 3;

pub const COLLECTIVITY_USER: i64 = 100;
pub const DDFIP_ADMIN: i64 = 110;
pub const OFFICE_MEMBER: i64 = 112;

fn commune(code_insee: &str, name: &str, code_departement: &str, epci: Option<&str>) -> Commune {
    Commune {
        code_insee: code_insee.to_string(),
        name: name.to_string(),
        code_departement: code_departement.to_string(),
        siren_epci: epci.map(str::to_string),
    }
}

fn user(user_id: i64, organization_id: i64, organization_admin: bool) -> User {
    User {
        user_id,
        organization_id,
        name: format!("User {user_id}"),
        email: format!("user{user_id}@example.org"),
        organization_admin,
        super_admin: false,
        form_admin_types: BTreeSet::new(),
        office_ids: BTreeSet::new(),
    }
}

fn office(office_id: i64, ddfip_id: i64, competences: &[FormType]) -> Office {
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

pub fn create_test_seed() -> Seed {
    let mut habitation: Office = office(
        OFFICE_HABITATION,
        DDFIP_64,
        &[FormType::ValuationHabitation, FormType::OccupancyHabitation],
    );
    habitation.departements.insert(String::from("64"));
    habitation.member_ids.insert(OFFICE_MEMBER);

    let mut pau: Office = office(OFFICE_PAU, DDFIP_64, &[FormType::CreationProfessional]);
    pau.communes.insert(String::from("64445"));

    let mut landes: Office = office(OFFICE_LANDES, DDFIP_40, &FormType::ALL);
    landes.departements.insert(String::from("40"));

    Seed {
        communes: vec![
            commune("64102", "Bayonne", "64", Some("200067106")),
            commune("64445", "Pau", "64", Some("200067254")),
            commune("40192", "Mont-de-Marsan", "40", None),
        ],
        organizations: vec![
            Organization::Collectivity(Collectivity {
                collectivity_id: COLLECTIVITY,
                name: String::from("Bayonne"),
                publisher_id: Some(PUBLISHER),
                territory: CollectivityTerritory::Commune(String::from("64102")),
            }),
            Organization::Publisher(Publisher {
                publisher_id: PUBLISHER,
                name: String::from("Fiscalite Logiciels"),
            }),
            Organization::Collectivity(Collectivity {
                collectivity_id: OTHER_COLLECTIVITY,
                name: String::from("CA Pays Basque"),
                publisher_id: None,
                territory: CollectivityTerritory::Epci(String::from("200067106")),
            }),
            Organization::Ddfip(Ddfip {
                ddfip_id: DDFIP_64,
                name: String::from("DDFIP des Pyrenees-Atlantiques"),
                code_departement: String::from("64"),
            }),
            Organization::Ddfip(Ddfip {
                ddfip_id: DDFIP_40,
                name: String::from("DDFIP des Landes"),
                code_departement: String::from("40"),
            }),
            Organization::Dgfip(Dgfip {
                dgfip_id: DGFIP,
                name: String::from("DGFIP"),
            }),
        ],
        users: vec![
            user(COLLECTIVITY_USER, COLLECTIVITY, false),
            user(DDFIP_ADMIN, DDFIP_64, true),
            user(OFFICE_MEMBER, DDFIP_64, false),
        ],
        offices: vec![habitation, pau, landes],
    }
}

pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.load_seed(&create_test_seed()).unwrap();
    persistence
}

pub fn create_test_actor() -> Actor {
    Actor::user(COLLECTIVITY_USER, COLLECTIVITY)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn create_test_new_report(commune: &str, form_type: FormType) -> NewReport {
    NewReport {
        origin: Origin::WebUi,
        collectivity_id: COLLECTIVITY,
        publisher_id: None,
        sandbox: false,
        commune: commune.to_string(),
        form_type,
        priority: Priority::Medium,
        note: None,
    }
}

/// Creates and stores a draft report.
pub fn create_stored_report(persistence: &mut Persistence, new_report: NewReport) -> Report {
    let territory: Territory = persistence.load_territory().unwrap();
    let reference: String = persistence.next_report_reference(NOW).unwrap();
    let result: CreationResult = apply_create(
        &territory,
        new_report,
        reference,
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();
    persistence.create_report(&result).unwrap()
}

/// Applies a command that must change the report, without storing it.
pub fn transition(persistence: &mut Persistence, report: &Report, command: Command) -> TransitionResult {
    let territory: Territory = persistence.load_territory().unwrap();
    match apply(
        &territory,
        report,
        command,
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap()
    {
        TransitionOutcome::Applied(result) => result,
        TransitionOutcome::Unchanged => panic!("expected the command to change the report"),
    }
}

/// Applies and stores a command, returning the stored report.
pub fn transition_stored(persistence: &mut Persistence, report: &Report, command: Command) -> Report {
    let result: TransitionResult = transition(persistence, report, command);
    persistence.persist_transition(&result).unwrap();
    persistence.get_report(report.report_id).unwrap()
}
